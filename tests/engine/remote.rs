//! RemoteEngine against a live server.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use configmaps::{
    CallContext, CreateOptions, Engine, EngineError, ListRequest, Outcome, RemoteEngine,
    RemoveOptions, TransportError,
};
use tokio_util::sync::CancellationToken;

use crate::support::{create, listed_names, memory_engine, names, start_server};

async fn remote_over_memory() -> (RemoteEngine, configmaps::LocalEngine) {
    let local = memory_engine();
    let base = start_server(Arc::new(local.clone())).await;
    (RemoteEngine::new(&base).unwrap(), local)
}

#[tokio::test]
async fn create_reaches_the_server_manager() {
    let (remote, local) = remote_over_memory().await;
    let id = create(&remote, "app", b"\x00binary\xffpayload").await;

    let (record, data) = local.manager().lookup_data("app").unwrap();
    assert_eq!(record.id, id);
    assert_eq!(data, b"\x00binary\xffpayload");

    let report = remote
        .inspect(&CallContext::background(), &[id.clone()])
        .await
        .unwrap()
        .remove(0)
        .into_result()
        .unwrap();
    assert_eq!(report.name(), "app");
    assert_eq!(report.spec.driver.name, "memory");
}

#[tokio::test]
async fn driver_options_travel_with_create() {
    let (remote, local) = remote_over_memory().await;
    remote
        .create(
            &CallContext::background(),
            "app",
            &mut Cursor::new(b"x".to_vec()),
            CreateOptions::default()
                .with_driver("memory")
                .with_option("tier", "gold"),
        )
        .await
        .unwrap();

    let record = local.manager().lookup("app").unwrap();
    assert_eq!(record.driver_options.get("tier").map(String::as_str), Some("gold"));
}

#[tokio::test]
async fn conflict_and_invalid_input_keep_their_class() {
    let (remote, _local) = remote_over_memory().await;
    let ctx = CallContext::background();
    create(&remote, "app", b"").await;

    let err = remote
        .create(&ctx, "app", &mut Cursor::new(Vec::new()), CreateOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NameConflict("app".into()));

    let err = remote
        .create(&ctx, "bad name", &mut Cursor::new(Vec::new()), CreateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)), "{err:?}");
}

#[tokio::test]
async fn list_applies_filters_server_side() {
    let (remote, _local) = remote_over_memory().await;
    for name in ["alpha", "beta", "gamma"] {
        create(&remote, name, b"").await;
    }
    let ctx = CallContext::background();

    let reports = remote
        .list(&ctx, &ListRequest::new().filter("name", "^al").filter("name", "^be"))
        .await
        .unwrap();
    let listed: Vec<&str> = reports.iter().map(|r| r.name()).collect();
    assert_eq!(listed, vec!["alpha", "beta"]);

    let err = remote
        .list(&ctx, &ListRequest::new().filter("bogus", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter(_)), "{err:?}");
}

#[tokio::test]
async fn remove_by_name_reports_ids_and_missing() {
    let (remote, _local) = remote_over_memory().await;
    let first = create(&remote, "exists1", b"").await;
    let second = create(&remote, "exists2", b"").await;

    let outcomes = remote
        .remove(
            &CallContext::background(),
            &names(&["exists1", "missing", "exists2"]),
            RemoveOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(outcomes[0].as_ok().map(|r| r.id.clone()), Some(first));
    assert_eq!(outcomes[1], Outcome::NotFound("missing".into()));
    assert_eq!(outcomes[2].as_ok().map(|r| r.id.clone()), Some(second));
    assert!(listed_names(&remote).await.is_empty());
}

#[tokio::test]
async fn dot_identifiers_are_not_found() {
    let (remote, _local) = remote_over_memory().await;
    create(&remote, "app", b"").await;
    let ctx = CallContext::background();

    let inspected = remote.inspect(&ctx, &names(&[".", "..", "app"])).await.unwrap();
    assert_eq!(inspected[0], Outcome::NotFound(".".into()));
    assert_eq!(inspected[1], Outcome::NotFound("..".into()));
    assert!(inspected[2].is_ok());

    let removed = remote
        .remove(&ctx, &names(&[".", ".."]), RemoveOptions::default())
        .await
        .unwrap();
    assert_eq!(removed[0], Outcome::NotFound(".".into()));
    assert_eq!(removed[1], Outcome::NotFound("..".into()));
    assert_eq!(listed_names(&remote).await, vec!["app"]);

    let err = remote.update(&ctx, "..", b"x").await.unwrap_err();
    assert!(matches!(err, EngineError::Unsupported(_)), "{err:?}");
}

#[tokio::test]
async fn remove_all_over_http() {
    let (remote, local) = remote_over_memory().await;
    for name in ["a", "b"] {
        create(&remote, name, b"").await;
    }
    let outcomes = remote
        .remove(&CallContext::background(), &[], RemoveOptions { all: true })
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(local.manager().list().unwrap().is_empty());
}

#[tokio::test]
async fn update_is_unsupported() {
    let (remote, local) = remote_over_memory().await;
    create(&remote, "app", b"v1").await;

    let err = remote
        .update(&CallContext::background(), "app", b"v2")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unsupported(_)), "{err:?}");
    assert_eq!(local.manager().lookup_data("app").unwrap().1, b"v1");
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = RemoteEngine::new(&format!("http://{addr}")).unwrap();
    let err = remote
        .inspect(&CallContext::background(), &names(&["app"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Transport(TransportError::Connect(_))), "{err:?}");
}

/// Accepts connections and never answers.
async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn deadline_aborts_a_hung_request() {
    let remote = RemoteEngine::new(&silent_server().await).unwrap();
    let ctx = CallContext::with_timeout(Duration::from_millis(100));

    let err = remote.list(&ctx, &ListRequest::new()).await.unwrap_err();
    assert_eq!(err, EngineError::Transport(TransportError::DeadlineExceeded));
}

#[tokio::test]
async fn cancellation_aborts_a_hung_request() {
    let remote = RemoteEngine::new(&silent_server().await).unwrap();
    let token = CancellationToken::new();
    let ctx = CallContext::with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    let err = remote.list(&ctx, &ListRequest::new()).await.unwrap_err();
    canceller.await.unwrap();
    assert_eq!(err, EngineError::Transport(TransportError::Cancelled));
}
