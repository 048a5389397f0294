//! Test infrastructure and fixtures for GitPulse.
//!
//! Provides builders for realistic GitHub webhook payloads so tests do
//! not hand-assemble nested JSON inline. Builders cover the happy path by
//! default; tests knock out individual fields to exercise the skip paths.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod database;
pub mod payloads;

pub use database::TestDatabase;
pub use payloads::{PullRequestPayloadBuilder, PushPayloadBuilder};
