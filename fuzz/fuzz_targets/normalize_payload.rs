#![no_main]

//! Fuzz target for webhook payload normalization.
//!
//! Feeds arbitrary event kinds and bodies through the normalizer to
//! ensure it never panics on malformed, truncated, or adversarial
//! payloads; every outcome must be a well-formed event or a skip.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &[u8])| {
    let (kind, body) = input;

    if let Ok(event) = gitpulse_core::normalize(kind, body) {
        // A produced event must satisfy the from-branch invariant.
        let is_push = event.event_type == gitpulse_core::EventType::Push;
        assert_eq!(event.from_branch.is_none(), is_push);
    }
});
