//! Canonical event model and strongly-typed identifiers.
//!
//! Defines the persisted event record, the closed event-type enum, and the
//! newtype ID wrapper with database serialization support. Records are
//! created once by the normalizer and never mutated after insertion.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

type PgDb = sqlx::Postgres;
type PgValueRef<'r> = sqlx::postgres::PgValueRef<'r>;
type PgTypeInfo = sqlx::postgres::PgTypeInfo;
type PgArgumentBuffer = sqlx::postgres::PgArgumentBuffer;
type EncodeResult =
    Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync + 'static>>;
type BoxDynError = sqlx::error::BoxDynError;

/// Strongly-typed event identifier.
///
/// Wraps a UUID to prevent mixing with other ID types. Assigned by the
/// storage layer at insertion; events are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl sqlx::Type<PgDb> for EventId {
    fn type_info() -> PgTypeInfo {
        <Uuid as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for EventId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let uuid = <Uuid as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(Self(uuid))
    }
}

impl sqlx::Encode<'_, PgDb> for EventId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <Uuid as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Kind of source-control activity a stored event describes.
///
/// Closed set by construction: the normalizer only ever produces these
/// three kinds, so no other value can reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Commits pushed to a branch.
    Push,
    /// Pull request opened.
    PullRequest,
    /// Pull request closed with a merge.
    Merge,
}

impl EventType {
    /// Returns the wire spelling used in storage and API responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event type string.
#[derive(Debug, Error)]
#[error("unknown event type: {0}")]
pub struct ParseEventTypeError(String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Self::Push),
            "pull_request" => Ok(Self::PullRequest),
            "merge" => Ok(Self::Merge),
            other => Err(ParseEventTypeError(other.to_string())),
        }
    }
}

impl sqlx::Type<PgDb> for EventType {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<PgDb>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as sqlx::Type<PgDb>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for EventType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(text.parse()?)
    }
}

impl sqlx::Encode<'_, PgDb> for EventType {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <&str as sqlx::Encode<PgDb>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// A normalized event ready for insertion.
///
/// Produced by [`crate::normalize`] from a raw webhook payload. Identity
/// and `created_at` are assigned by the storage layer when the record is
/// inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Kind of activity this event describes.
    pub event_type: EventType,

    /// Login or name of the user who performed the action.
    pub author: String,

    /// Name of the repository the event belongs to.
    pub repository: String,

    /// Source branch. `None` exactly when `event_type` is [`EventType::Push`].
    pub from_branch: Option<String>,

    /// Target branch.
    pub to_branch: String,

    /// ISO-8601 timestamp taken verbatim from the provider payload.
    ///
    /// Commit time for pushes, creation time for opened pull requests,
    /// merge time for merges. Parsed only at display time.
    pub timestamp: String,
}

/// A persisted canonical event.
///
/// Same shape as [`NewEvent`] plus the storage-assigned identity and the
/// server-side insertion timestamp used for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredEvent {
    /// Storage-assigned identity.
    pub id: EventId,

    /// Kind of activity this event describes.
    pub event_type: EventType,

    /// Login or name of the user who performed the action.
    pub author: String,

    /// Name of the repository the event belongs to.
    pub repository: String,

    /// Source branch, absent for pushes.
    pub from_branch: Option<String>,

    /// Target branch.
    pub to_branch: String,

    /// Raw provider timestamp, stored as received.
    #[sqlx(rename = "commit_timestamp")]
    pub timestamp: String,

    /// Server clock at insertion, monotonically non-decreasing with
    /// insertion order.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_through_text() {
        for ty in [EventType::Push, EventType::PullRequest, EventType::Merge] {
            assert_eq!(ty.as_str().parse::<EventType>().unwrap(), ty);
        }
    }

    #[test]
    fn unknown_event_type_fails_to_parse() {
        let err = "issue_comment".parse::<EventType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event type: issue_comment");
    }

    #[test]
    fn event_ids_are_unique() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn event_type_serializes_as_snake_case() {
        let json = serde_json::to_string(&EventType::PullRequest).unwrap();
        assert_eq!(json, "\"pull_request\"");
    }
}
