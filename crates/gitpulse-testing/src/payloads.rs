//! Builders for GitHub webhook payloads with sensible defaults.

use serde_json::{json, Value};

/// Builder for `push` event payloads.
///
/// Defaults describe alice pushing to `refs/heads/main` in `demo-repo`.
#[derive(Debug, Clone)]
pub struct PushPayloadBuilder {
    git_ref: String,
    pusher: String,
    timestamp: String,
    repository: String,
}

impl PushPayloadBuilder {
    /// Creates a builder with sensible defaults.
    pub fn new() -> Self {
        Self {
            git_ref: "refs/heads/main".to_string(),
            pusher: "alice".to_string(),
            timestamp: "2021-04-01T21:30:00Z".to_string(),
            repository: "demo-repo".to_string(),
        }
    }

    /// Sets the full git ref string.
    #[must_use]
    pub fn git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }

    /// Sets the pusher name.
    #[must_use]
    pub fn pusher(mut self, name: impl Into<String>) -> Self {
        self.pusher = name.into();
        self
    }

    /// Sets the head commit timestamp.
    #[must_use]
    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = ts.into();
        self
    }

    /// Sets the repository name.
    #[must_use]
    pub fn repository(mut self, name: impl Into<String>) -> Self {
        self.repository = name.into();
        self
    }

    /// Builds the payload as a JSON value.
    pub fn build(&self) -> Value {
        json!({
            "ref": self.git_ref,
            "before": "0000000000000000000000000000000000000000",
            "after": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
            "pusher": { "name": self.pusher, "email": format!("{}@example.com", self.pusher) },
            "head_commit": {
                "id": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
                "message": "update",
                "timestamp": self.timestamp,
            },
            "repository": { "name": self.repository, "full_name": format!("{}/{}", self.pusher, self.repository) },
        })
    }

    /// Builds the payload as raw request body bytes.
    pub fn build_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).expect("payload serializes")
    }
}

impl Default for PushPayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `pull_request` event payloads.
///
/// Defaults describe bob opening a pull request from `feature/login` to
/// `main` in `demo-repo`. Switch to the merged-close shape with
/// [`Self::closed_merged`].
#[derive(Debug, Clone)]
pub struct PullRequestPayloadBuilder {
    action: String,
    author: String,
    head_ref: String,
    base_ref: String,
    created_at: String,
    repository: String,
    merged: bool,
    merged_at: Option<String>,
    merged_by: Option<String>,
}

impl PullRequestPayloadBuilder {
    /// Creates a builder for an `opened` pull request.
    pub fn opened() -> Self {
        Self {
            action: "opened".to_string(),
            author: "bob".to_string(),
            head_ref: "feature/login".to_string(),
            base_ref: "main".to_string(),
            created_at: "2021-04-01T09:00:00Z".to_string(),
            repository: "demo-repo".to_string(),
            merged: false,
            merged_at: None,
            merged_by: None,
        }
    }

    /// Creates a builder for a `closed` pull request that was merged.
    pub fn closed_merged() -> Self {
        Self {
            action: "closed".to_string(),
            merged: true,
            merged_at: Some("2021-04-02T14:00:00Z".to_string()),
            merged_by: Some("carol".to_string()),
            ..Self::opened()
        }
    }

    /// Creates a builder for a `closed` pull request that was not merged.
    pub fn closed_unmerged() -> Self {
        Self { action: "closed".to_string(), ..Self::opened() }
    }

    /// Sets the action string.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Sets the pull request author login.
    #[must_use]
    pub fn author(mut self, login: impl Into<String>) -> Self {
        self.author = login.into();
        self
    }

    /// Sets the head (source) branch ref.
    #[must_use]
    pub fn head_ref(mut self, name: impl Into<String>) -> Self {
        self.head_ref = name.into();
        self
    }

    /// Sets the base (target) branch ref.
    #[must_use]
    pub fn base_ref(mut self, name: impl Into<String>) -> Self {
        self.base_ref = name.into();
        self
    }

    /// Sets the pull request creation timestamp.
    #[must_use]
    pub fn created_at(mut self, ts: impl Into<String>) -> Self {
        self.created_at = ts.into();
        self
    }

    /// Sets the repository name.
    #[must_use]
    pub fn repository(mut self, name: impl Into<String>) -> Self {
        self.repository = name.into();
        self
    }

    /// Sets the merge timestamp.
    #[must_use]
    pub fn merged_at(mut self, ts: impl Into<String>) -> Self {
        self.merged_at = Some(ts.into());
        self
    }

    /// Sets the login of the user who performed the merge.
    #[must_use]
    pub fn merged_by(mut self, login: impl Into<String>) -> Self {
        self.merged_by = Some(login.into());
        self
    }

    /// Clears `merged_by`, as GitHub sends for some merge flows.
    #[must_use]
    pub fn without_merged_by(mut self) -> Self {
        self.merged_by = None;
        self
    }

    /// Builds the payload as a JSON value.
    pub fn build(&self) -> Value {
        json!({
            "action": self.action,
            "number": 7,
            "pull_request": {
                "user": { "login": self.author },
                "head": { "ref": self.head_ref },
                "base": { "ref": self.base_ref },
                "created_at": self.created_at,
                "merged": self.merged,
                "merged_at": self.merged_at,
                "merged_by": self.merged_by.as_ref().map(|login| json!({ "login": login })),
            },
            "repository": { "name": self.repository, "full_name": format!("{}/{}", self.author, self.repository) },
        })
    }

    /// Builds the payload as raw request body bytes.
    pub fn build_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).expect("payload serializes")
    }
}
