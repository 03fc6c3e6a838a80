use greetings::application::dto::{CreateGreetingRequestDto, GreetingResponseDto};
use greetings::application::{CreateGreetingInput, GreetingError, GreetingQueries, MutationStatus};
use greetings::lifecycle::GreetingSystem;
use greetings::query::QueryStatus;
use greetings::repository::mock::{MockGreetingRepository, RepositoryCall};
use greetings::repository::RepositoryError;
use std::sync::Arc;
use std::time::Duration;

fn dto(id: &str, message: &str) -> GreetingResponseDto {
    GreetingResponseDto {
        id: Some(id.into()),
        message: message.into(),
        timestamp: None,
    }
}

fn system(mock: &MockGreetingRepository) -> GreetingSystem {
    GreetingSystem::new(Arc::new(mock.clone()))
}

/// Reading the list, creating a greeting, then reading the list again goes
/// back to the service for the second read.
#[tokio::test]
async fn test_list_refetches_after_create() {
    let mock = MockGreetingRepository::new();
    mock.expect_list_greetings().return_ok(vec![dto("1", "Hello")]);
    mock.expect_create_greeting().return_ok(dto("2", "Hi there"));
    mock.expect_list_greetings()
        .return_ok(vec![dto("1", "Hello"), dto("2", "Hi there")]);
    let system = system(&mock);

    let before = system.queries.list().await.expect("Failed to list");
    assert_eq!(before.len(), 1);

    let created = system
        .create_greeting
        .mutate(CreateGreetingInput::new("Hi there"))
        .await
        .expect("Failed to create");
    assert_eq!(created.id(), "2");

    let stale = system
        .queries
        .state(GreetingQueries::lists())
        .await
        .unwrap()
        .expect("list entry missing");
    assert!(stale.is_stale);
    assert_eq!(stale.status, QueryStatus::Idle);

    let after = system.queries.list().await.expect("Failed to list");
    assert_eq!(after.len(), 2);
    assert!(after.contains(&created));

    assert_eq!(
        mock.calls(),
        vec![
            RepositoryCall::ListGreetings,
            RepositoryCall::CreateGreeting(CreateGreetingRequestDto {
                message: "Hi there".into()
            }),
            RepositoryCall::ListGreetings,
        ]
    );
    mock.verify();
    system.shutdown().await.expect("Shutdown failed");
}

/// Two concurrent reads of the same detail key share one request.
#[tokio::test]
async fn test_concurrent_detail_reads_share_one_request() {
    let mock = MockGreetingRepository::new();
    mock.expect_get_greeting_by_id("1").return_ok(dto("1", "Hello"));
    mock.hold();
    let system = system(&mock);

    let (first, second, ()) = tokio::join!(
        system.queries.detail(Some("1")),
        system.queries.detail(Some("1")),
        async {
            mock.wait_for_calls(1).await;
            mock.release();
        }
    );

    let first = first.expect("first read failed");
    let second = second.expect("second read failed");
    assert_eq!(first.id(), "1");
    assert_eq!(first.message(), second.message());
    assert_eq!(
        mock.count_calls(|c| matches!(c, RepositoryCall::GetGreetingById(_))),
        1
    );
    mock.verify();
}

#[tokio::test]
async fn test_invalid_input_makes_no_request_and_keeps_cache() {
    let mock = MockGreetingRepository::new();
    mock.expect_list_greetings().return_ok(vec![dto("1", "Hello")]);
    let system = system(&mock);
    system.queries.list().await.unwrap();

    let err = system
        .create_greeting
        .mutate(CreateGreetingInput::new(""))
        .await
        .unwrap_err();

    assert!(matches!(err, GreetingError::Validation(_)));
    assert_eq!(err.to_string(), "Validation failed: message: Message cannot be empty");
    assert_eq!(mock.calls(), vec![RepositoryCall::ListGreetings]);

    let state = system
        .queries
        .state(GreetingQueries::lists())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.status, QueryStatus::Success);
    assert!(!state.is_stale);
}

#[tokio::test]
async fn test_failed_create_does_not_invalidate() {
    let mock = MockGreetingRepository::new();
    mock.expect_list_greetings().return_ok(vec![dto("1", "Hello")]);
    mock.expect_create_greeting()
        .return_err(RepositoryError::Transport("connection reset".into()));
    let system = system(&mock);

    system.queries.list().await.unwrap();
    let err = system
        .create_greeting
        .mutate(CreateGreetingInput::new("Hi"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GreetingError::Repository(RepositoryError::Transport("connection reset".into()))
    );
    assert!(matches!(
        system.create_greeting.status(),
        MutationStatus::Error(_)
    ));

    // Served from memory
    assert_eq!(system.queries.list().await.unwrap().len(), 1);
    assert_eq!(
        mock.count_calls(|c| matches!(c, RepositoryCall::ListGreetings)),
        1
    );
    mock.verify();
}

#[tokio::test]
async fn test_transport_error_reaches_every_waiter() {
    let mock = MockGreetingRepository::new();
    mock.expect_list_greetings()
        .return_err(RepositoryError::Status {
            status: 503,
            message: "maintenance".into(),
        });
    mock.hold();
    let system = system(&mock);

    let (first, second, ()) = tokio::join!(
        system.queries.list(),
        system.queries.list(),
        async {
            mock.wait_for_calls(1).await;
            mock.release();
        }
    );

    let expected = GreetingError::Repository(RepositoryError::Status {
        status: 503,
        message: "maintenance".into(),
    });
    assert_eq!(first.unwrap_err(), expected);
    assert_eq!(second.unwrap_err(), expected);
    mock.verify();
}

/// A read whose caller gave up is not memoized; the next read fetches again.
#[tokio::test]
async fn test_abandoned_read_is_discarded() {
    let mock = MockGreetingRepository::new();
    mock.expect_list_greetings().return_ok(vec![dto("old", "Old")]);
    mock.expect_list_greetings().return_ok(vec![dto("new", "New")]);
    mock.hold();
    let system = system(&mock);

    let gave_up = tokio::time::timeout(Duration::from_millis(20), system.queries.list()).await;
    assert!(gave_up.is_err());

    mock.release();
    loop {
        let state = system
            .queries
            .state(GreetingQueries::lists())
            .await
            .unwrap()
            .unwrap();
        if state.status != QueryStatus::Loading {
            assert_eq!(state.status, QueryStatus::Idle);
            assert!(state.data.is_none());
            break;
        }
        tokio::task::yield_now().await;
    }

    let list = system.queries.list().await.unwrap();
    assert_eq!(list[0].id(), "new");
    mock.verify();
}

/// One-off detail reads do not pile up: after invalidation and the idle
/// window, none of their entries are left.
#[tokio::test]
async fn test_one_off_detail_reads_are_evicted() {
    let mock = MockGreetingRepository::new();
    let ids: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    for id in &ids {
        mock.expect_get_greeting_by_id(id.as_str()).return_ok(dto(id, "Hi"));
    }
    let system = GreetingSystem::with_gc_time(Arc::new(mock.clone()), Duration::from_millis(50));

    for id in &ids {
        system.queries.detail(Some(id.as_str())).await.unwrap();
    }
    assert_eq!(system.queries.invalidate_all().await.unwrap(), ids.len());

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let mut left = 0;
            for id in &ids {
                let key = GreetingQueries::detail_key(Some(id.as_str()));
                if system.queries.state(key).await.unwrap().is_some() {
                    left += 1;
                }
            }
            if left == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("detail entries were never evicted");

    assert_eq!(system.queries.invalidate_all().await.unwrap(), 0);
    mock.verify();
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_shutdown_waits_for_cache_task() {
    let mock = MockGreetingRepository::new();
    let system = system(&mock);
    system.shutdown().await.expect("Shutdown failed");
}
