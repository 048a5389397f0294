//! Webhook payload normalization.
//!
//! Turns a raw GitHub webhook envelope (event kind header plus JSON body)
//! into a [`NewEvent`], or decides the event should be ignored. Payload
//! access goes through typed per-kind structures with an explicit
//! required-field step, so a missing path surfaces as a named
//! [`Skip::MissingField`] rather than an unchecked lookup.
//!
//! Every skip outcome is benign: the caller logs it and acknowledges the
//! webhook without storing anything. No partial records are ever produced.

use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::models::{EventType, NewEvent};

/// Reason a webhook envelope produced no event.
///
/// None of these are request failures; they all map to a neutral
/// "ignored" acknowledgement at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    /// The body was not valid JSON for the matched event kind.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A field the matched rule requires was absent or null.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The event kind is not one we track.
    #[error("unrecognized event kind: {0}")]
    UnrecognizedEvent(String),

    /// A pull_request action with no handling rule, including closed
    /// pull requests that were not merged.
    #[error("unhandled pull_request action: {0}")]
    UnhandledAction(String),
}

/// Normalizes a raw webhook envelope into a canonical event.
///
/// `kind` is the provider's event kind header value; `payload` is the raw
/// request body. Returns `Err(Skip)` for anything that should be ignored.
///
/// Rules, in priority order:
/// 1. `push` — author from `pusher.name`, target branch from the last
///    segment of `ref`, timestamp from `head_commit.timestamp`.
/// 2. `pull_request` with action `opened` — a pull_request event drawn
///    from the head/base refs and `created_at`.
/// 3. `pull_request` with action `closed` and `merged = true` — a merge
///    event timestamped with `merged_at`, authored by `merged_by` when
///    present, else the pull request's original author.
/// 4. Everything else is skipped.
pub fn normalize(kind: &str, payload: &[u8]) -> Result<NewEvent, Skip> {
    match kind {
        "push" => normalize_push(payload),
        "pull_request" => normalize_pull_request(payload),
        other => Err(Skip::UnrecognizedEvent(other.to_string())),
    }
}

fn normalize_push(payload: &[u8]) -> Result<NewEvent, Skip> {
    let push: PushPayload = parse(payload)?;

    let git_ref = require(push.git_ref, "ref")?;
    let author = require(require(push.pusher, "pusher")?.name, "pusher.name")?;
    let timestamp =
        require(require(push.head_commit, "head_commit")?.timestamp, "head_commit.timestamp")?;
    let repository = require(require(push.repository, "repository")?.name, "repository.name")?;

    Ok(NewEvent {
        event_type: EventType::Push,
        author,
        repository,
        from_branch: None,
        to_branch: branch_name(&git_ref).to_string(),
        timestamp,
    })
}

fn normalize_pull_request(payload: &[u8]) -> Result<NewEvent, Skip> {
    let envelope: PullRequestPayload = parse(payload)?;
    let action = require(envelope.action, "action")?;

    match action.as_str() {
        "opened" => {
            let pr = require(envelope.pull_request, "pull_request")?;
            let author =
                require(require(pr.user, "pull_request.user")?.login, "pull_request.user.login")?;
            let from_branch =
                require(require(pr.head, "pull_request.head")?.name, "pull_request.head.ref")?;
            let to_branch =
                require(require(pr.base, "pull_request.base")?.name, "pull_request.base.ref")?;
            let timestamp = require(pr.created_at, "pull_request.created_at")?;
            let repository =
                require(require(envelope.repository, "repository")?.name, "repository.name")?;

            Ok(NewEvent {
                event_type: EventType::PullRequest,
                author,
                repository,
                from_branch: Some(from_branch),
                to_branch,
                timestamp,
            })
        },
        "closed" => {
            let pr = require(envelope.pull_request, "pull_request")?;
            if pr.merged != Some(true) {
                // Closed without merging has no rule; intentionally ignored.
                return Err(Skip::UnhandledAction("closed".to_string()));
            }

            let author = match pr.merged_by {
                Some(account) => require(account.login, "pull_request.merged_by.login")?,
                None => require(
                    require(pr.user, "pull_request.user")?.login,
                    "pull_request.user.login",
                )?,
            };
            let from_branch =
                require(require(pr.head, "pull_request.head")?.name, "pull_request.head.ref")?;
            let to_branch =
                require(require(pr.base, "pull_request.base")?.name, "pull_request.base.ref")?;
            let timestamp = require(pr.merged_at, "pull_request.merged_at")?;
            let repository =
                require(require(envelope.repository, "repository")?.name, "repository.name")?;

            Ok(NewEvent {
                event_type: EventType::Merge,
                author,
                repository,
                from_branch: Some(from_branch),
                to_branch,
                timestamp,
            })
        },
        other => Err(Skip::UnhandledAction(other.to_string())),
    }
}

/// Extracts the branch name from a slash-delimited ref string.
///
/// `refs/heads/main` becomes `main`; a ref with no slashes is returned
/// unchanged.
fn branch_name(git_ref: &str) -> &str {
    git_ref.rsplit('/').next().unwrap_or(git_ref)
}

fn parse<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Skip> {
    serde_json::from_slice(payload).map_err(|e| Skip::MalformedPayload(e.to_string()))
}

fn require<T>(value: Option<T>, path: &'static str) -> Result<T, Skip> {
    value.ok_or(Skip::MissingField(path))
}

// Typed payload subsets per event kind. Every field is optional at the
// serde level so absence is reported per path, not as a decode failure.

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    pusher: Option<Pusher>,
    head_commit: Option<HeadCommit>,
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct Pusher {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HeadCommit {
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: Option<String>,
    pull_request: Option<PullRequest>,
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    user: Option<Account>,
    head: Option<BranchRef>,
    base: Option<BranchRef>,
    created_at: Option<String>,
    merged: Option<bool>,
    merged_at: Option<String>,
    merged_by: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: Option<String>,
}
