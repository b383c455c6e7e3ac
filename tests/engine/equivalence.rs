//! The same script against a LocalEngine and a RemoteEngine must observe the
//! same results, up to generated IDs and timestamps.

use std::io::Cursor;
use std::sync::Arc;

use configmaps::{
    CallContext, CreateOptions, Engine, EngineError, InfoReport, ListRequest, Outcome,
    RemoteEngine, RemoveOptions,
};

use crate::support::{memory_engine, names, start_server};

/// What a step observed, with IDs and timestamps stripped.
#[derive(Debug, PartialEq, Eq)]
enum Observed {
    Created,
    Failed(String),
    Reports(Vec<Option<(String, String)>>),
    Removed(Vec<bool>),
}

fn class(err: &EngineError) -> String {
    let kind = match err {
        EngineError::NotFound(subject) => return format!("not found {subject}"),
        EngineError::NameConflict(subject) => return format!("conflict {subject}"),
        EngineError::InvalidFilter(_) => "invalid filter",
        EngineError::InvalidInput(_) => "invalid input",
        EngineError::Unsupported(_) => "unsupported",
        EngineError::Backend(_) | EngineError::Server { .. } => "server failure",
        EngineError::Decode(_) => "decode",
        EngineError::Transport(_) => "transport",
    };
    kind.to_string()
}

fn summarize(report: &InfoReport) -> (String, String) {
    (report.name().to_string(), report.spec.driver.name.clone())
}

async fn run_script(engine: &dyn Engine) -> Vec<Observed> {
    let ctx = CallContext::background();
    let mut observed = Vec::new();

    for (name, driver) in [
        ("alpha", ""),
        ("beta", "memory"),
        ("gamma", ""),
        ("alpha", ""),
        ("bad/name", ""),
        ("delta", "vault"),
    ] {
        let result = engine
            .create(
                &ctx,
                name,
                &mut Cursor::new(name.as_bytes().to_vec()),
                CreateOptions::default().with_driver(driver),
            )
            .await;
        observed.push(match result {
            Ok(_) => Observed::Created,
            Err(err) => Observed::Failed(class(&err)),
        });
    }

    let requests = [
        ListRequest::new(),
        ListRequest::new().filter("name", "^al"),
        ListRequest::new().filter("name", "^al").filter("name", "^be"),
        ListRequest::new().filter("name", "^al").filter("id", "nomatch"),
        ListRequest::new().filter("NAME", "a$"),
        ListRequest::new().filter("bogus", "x"),
        ListRequest::new().filter("name", "("),
    ];
    for request in &requests {
        observed.push(match engine.list(&ctx, request).await {
            Ok(reports) => Observed::Reports(reports.iter().map(|r| Some(summarize(r))).collect()),
            Err(err) => Observed::Failed(class(&err)),
        });
    }

    let inspected = engine
        .inspect(&ctx, &names(&["gamma", "missing", ".", "..", "alpha"]))
        .await;
    observed.push(match inspected {
        Ok(outcomes) => Observed::Reports(
            outcomes
                .iter()
                .map(|outcome| outcome.as_ok().map(summarize))
                .collect(),
        ),
        Err(err) => Observed::Failed(class(&err)),
    });

    for name in ["alpha", ".."] {
        observed.push(match engine.update(&ctx, name, b"changed").await {
            Ok(()) => Observed::Created,
            Err(err) => Observed::Failed(class(&err)),
        });
    }

    for (targets, options) in [
        (names(&["beta", "missing", ".."]), RemoveOptions::default()),
        (Vec::new(), RemoveOptions { all: true }),
    ] {
        observed.push(match engine.remove(&ctx, &targets, options).await {
            Ok(removed) => Observed::Removed(removed.iter().map(Outcome::is_ok).collect()),
            Err(err) => Observed::Failed(class(&err)),
        });
    }

    observed.push(match engine.list(&ctx, &ListRequest::new()).await {
        Ok(reports) => Observed::Reports(reports.iter().map(|r| Some(summarize(r))).collect()),
        Err(err) => Observed::Failed(class(&err)),
    });

    observed
}

#[tokio::test]
async fn local_and_remote_observe_the_same_results() {
    let local = memory_engine();
    let local_observed = run_script(&local).await;

    let base = start_server(Arc::new(memory_engine())).await;
    let remote = RemoteEngine::new(&base).unwrap();
    let remote_observed = run_script(&remote).await;

    assert_eq!(local_observed, remote_observed);

    // Spot-check the script itself.
    assert_eq!(local_observed[0], Observed::Created);
    assert_eq!(local_observed[3], Observed::Failed("conflict alpha".into()));
    assert_eq!(local_observed[4], Observed::Failed("invalid input".into()));
    assert_eq!(local_observed[11], Observed::Failed("invalid filter".into()));
    assert_eq!(local_observed[12], Observed::Failed("invalid filter".into()));
    assert_eq!(
        local_observed[13],
        Observed::Reports(vec![
            Some(("gamma".into(), "memory".into())),
            None,
            None,
            None,
            Some(("alpha".into(), "memory".into())),
        ])
    );
    assert_eq!(local_observed[14], Observed::Failed("unsupported".into()));
    assert_eq!(local_observed[15], Observed::Failed("unsupported".into()));
    assert_eq!(local_observed[16], Observed::Removed(vec![true, false, false]));
    assert_eq!(local_observed[18], Observed::Reports(Vec::new()));
}
