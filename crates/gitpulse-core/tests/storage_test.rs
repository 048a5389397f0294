//! Integration tests for the event repository against live PostgreSQL.
//!
//! Each test connects through [`TestDatabase`] and returns early when no
//! database is configured, so the suite still passes in environments
//! without PostgreSQL. Tests share one table and serialize on a lock.

use std::{sync::Arc, time::Duration};

use gitpulse_core::{EventType, NewEvent, Storage, TestClock};
use gitpulse_testing::TestDatabase;
use tokio::sync::Mutex;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn push_event(author: &str) -> NewEvent {
    NewEvent {
        event_type: EventType::Push,
        author: author.to_string(),
        repository: "demo-repo".to_string(),
        from_branch: None,
        to_branch: "main".to_string(),
        timestamp: "2021-04-01T21:30:00Z".to_string(),
    }
}

fn merge_event(author: &str) -> NewEvent {
    NewEvent {
        event_type: EventType::Merge,
        author: author.to_string(),
        repository: "demo-repo".to_string(),
        from_branch: Some("dev".to_string()),
        to_branch: "main".to_string(),
        timestamp: "2021-04-02T09:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn insert_round_trips_all_columns() {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = TestDatabase::connect().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    db.reset().await.expect("reset events table");

    let clock = Arc::new(TestClock::new());
    let storage = Storage::new(db.pool().clone(), clock.clone());

    let push_id = storage.events.insert(&push_event("alice")).await.expect("insert push");
    clock.advance(Duration::from_secs(1));
    let merge_id = storage.events.insert(&merge_event("bob")).await.expect("insert merge");
    assert_ne!(push_id, merge_id);

    let events = storage.events.recent(50).await.expect("list events");
    assert_eq!(events.len(), 2);

    // Newest first: the merge was inserted a second later.
    assert_eq!(events[0].id, merge_id);
    assert_eq!(events[0].event_type, EventType::Merge);
    assert_eq!(events[0].author, "bob");
    assert_eq!(events[0].from_branch.as_deref(), Some("dev"));
    assert_eq!(events[0].to_branch, "main");
    assert_eq!(events[0].timestamp, "2021-04-02T09:00:00Z");

    assert_eq!(events[1].id, push_id);
    assert_eq!(events[1].event_type, EventType::Push);
    assert_eq!(events[1].author, "alice");
    assert_eq!(events[1].from_branch, None);
    assert_eq!(events[1].repository, "demo-repo");
    assert_eq!(events[1].timestamp, "2021-04-01T21:30:00Z");
}

#[tokio::test]
async fn listing_caps_at_limit_and_orders_newest_first() {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = TestDatabase::connect().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    db.reset().await.expect("reset events table");

    let clock = Arc::new(TestClock::new());
    let storage = Storage::new(db.pool().clone(), clock.clone());

    for i in 0..55 {
        let event = push_event(&format!("user-{i:02}"));
        storage.events.insert(&event).await.expect("insert event");
        clock.advance(Duration::from_secs(1));
    }

    let events = storage.events.recent(50).await.expect("list events");
    assert_eq!(events.len(), 50);

    // The five oldest records fall off the window.
    assert_eq!(events[0].author, "user-54");
    assert_eq!(events[49].author, "user-05");

    assert!(
        events.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at),
        "created_at must be non-increasing from newest to oldest"
    );
}

#[tokio::test]
async fn created_at_follows_insertion_order() {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = TestDatabase::connect().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    db.reset().await.expect("reset events table");

    let clock = Arc::new(TestClock::new());
    let storage = Storage::new(db.pool().clone(), clock.clone());

    let mut inserted = Vec::new();
    for (i, advance_secs) in [0u64, 3, 0, 7, 1].into_iter().enumerate() {
        clock.advance(Duration::from_secs(advance_secs));
        let id = storage
            .events
            .insert(&push_event(&format!("user-{i}")))
            .await
            .expect("insert event");
        inserted.push(id);
    }

    let mut events = storage.events.recent(50).await.expect("list events");
    events.reverse();

    assert_eq!(events.len(), inserted.len());
    assert!(
        events.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at),
        "created_at must be non-decreasing in insertion order"
    );
}

#[tokio::test]
async fn equal_created_at_breaks_ties_by_id_descending() {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = TestDatabase::connect().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    db.reset().await.expect("reset events table");

    // Frozen clock: every insert lands on the same created_at.
    let clock = Arc::new(TestClock::new());
    let storage = Storage::new(db.pool().clone(), clock);

    for i in 0..3 {
        storage.events.insert(&push_event(&format!("user-{i}"))).await.expect("insert event");
    }

    let first = storage.events.recent(50).await.expect("list events");
    assert_eq!(first.len(), 3);
    assert!(first.windows(2).all(|pair| pair[0].created_at == pair[1].created_at));
    assert!(
        first.windows(2).all(|pair| pair[0].id.0 > pair[1].id.0),
        "equal timestamps must order by id descending"
    );

    let second = storage.events.recent(50).await.expect("list events again");
    let first_ids: Vec<_> = first.iter().map(|e| e.id).collect();
    let second_ids: Vec<_> = second.iter().map(|e| e.id).collect();
    assert_eq!(first_ids, second_ids, "tie order must be stable across queries");
}

#[tokio::test]
async fn listing_survives_rows_with_unknown_event_type() {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = TestDatabase::connect().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    db.reset().await.expect("reset events table");

    let clock = Arc::new(TestClock::new());
    let storage = Storage::new(db.pool().clone(), clock);

    storage.events.insert(&push_event("alice")).await.expect("insert push");

    // A row written outside the service with an event type the domain
    // model does not know about.
    sqlx::query(
        r#"
        INSERT INTO events (
            event_type, author, repository, from_branch, to_branch,
            commit_timestamp, created_at
        ) VALUES ('deploy', 'mallory', 'demo-repo', NULL, 'main',
                  '2021-04-01T21:30:00Z', NOW())
        "#,
    )
    .execute(db.pool())
    .await
    .expect("insert foreign row");

    let events = storage.events.recent(50).await.expect("listing must stay available");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].author, "alice");
    assert_eq!(events[0].event_type, EventType::Push);
}
