//! Property-based tests for normalization and formatting invariants.
//!
//! Deterministic, in-memory checks of rules that must hold for any input:
//! branch extraction, the from-branch/event-type invariant, and the
//! formatter's never-fail guarantee.

use chrono::{Datelike, TimeZone, Utc};
use gitpulse_core::{normalize, render_timestamp, EventType};
use gitpulse_testing::{PullRequestPayloadBuilder, PushPayloadBuilder};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        timeout: 5000,
        fork: false,
        failure_persistence: None,
        source_file: None,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// The target branch is always the last slash-delimited ref segment,
    /// no matter how many segments precede it.
    #[test]
    fn push_branch_is_always_last_segment(
        segments in prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..5),
    ) {
        let git_ref = segments.join("/");
        let payload = PushPayloadBuilder::new().git_ref(git_ref).build_bytes();

        let event = normalize("push", &payload).expect("valid push payload");

        prop_assert_eq!(&event.to_branch, segments.last().unwrap());
    }

    /// from_branch is None exactly for push events and Some for the
    /// pull_request and merge kinds.
    #[test]
    fn from_branch_presence_tracks_event_type(
        author in "[a-z]{1,12}",
        head in "[a-z]{1,12}",
        base in "[a-z]{1,12}",
    ) {
        let push = normalize(
            "push",
            &PushPayloadBuilder::new().pusher(author.clone()).build_bytes(),
        ).expect("valid push payload");
        prop_assert_eq!(push.event_type, EventType::Push);
        prop_assert!(push.from_branch.is_none());

        let opened = normalize(
            "pull_request",
            &PullRequestPayloadBuilder::opened()
                .author(author.clone())
                .head_ref(head.clone())
                .base_ref(base.clone())
                .build_bytes(),
        ).expect("valid opened payload");
        prop_assert_eq!(opened.event_type, EventType::PullRequest);
        prop_assert!(opened.from_branch.is_some());

        let merged = normalize(
            "pull_request",
            &PullRequestPayloadBuilder::closed_merged()
                .author(author)
                .head_ref(head)
                .base_ref(base)
                .build_bytes(),
        ).expect("valid merged payload");
        prop_assert_eq!(merged.event_type, EventType::Merge);
        prop_assert!(merged.from_branch.is_some());
    }

    /// The normalizer never panics, whatever the kind and body.
    #[test]
    fn normalize_never_panics(kind in "\\PC{0,16}", body in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = normalize(&kind, &body);
    }

    /// Arbitrary non-timestamp strings fall through render_timestamp
    /// unchanged instead of erroring.
    #[test]
    fn render_timestamp_falls_through_for_garbage(input in "[a-zA-Z !?]{0,32}") {
        prop_assert_eq!(render_timestamp(&input), input);
    }

    /// Every valid calendar day renders with a suffix and the year intact.
    #[test]
    fn rendered_timestamp_contains_day_and_suffix(day in 1u32..=28, month in 1u32..=12) {
        let ts = Utc.with_ymd_and_hms(2021, month, day, 12, 0, 0).unwrap();
        let rendered = render_timestamp(&ts.to_rfc3339());

        let suffix = match day {
            4..=20 | 24..=30 => "th",
            d if d % 10 == 1 => "st",
            d if d % 10 == 2 => "nd",
            d if d % 10 == 3 => "rd",
            _ => "th",
        };
        let expected_prefix = format!("{}{} ", ts.day(), suffix);
        prop_assert!(rendered.starts_with(&expected_prefix));
        prop_assert!(rendered.contains("2021"));
        prop_assert!(rendered.ends_with("UTC"));
    }
}
