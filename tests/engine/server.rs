//! HTTP routes exercised with raw reqwest.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::support::{create, memory_engine, start_server};

async fn server_with(names: &[&str]) -> (String, configmaps::LocalEngine) {
    let engine = memory_engine();
    for name in names {
        create(&engine, name, name.as_bytes()).await;
    }
    let base = start_server(Arc::new(engine.clone())).await;
    (base, engine)
}

#[tokio::test]
async fn create_returns_id() {
    let (base, engine) = server_with(&[]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/libpod/configmaps/create"))
        .json(&json!({ "Name": "app", "Data": "a2V5PXZhbHVl" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let id = body["ID"].as_str().unwrap();
    let (record, data) = engine.manager().lookup_data("app").unwrap();
    assert_eq!(record.id, id);
    assert_eq!(data, b"key=value");
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let (base, _engine) = server_with(&[]).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/configmaps/create");

    let cases = [
        json!({ "Name": "app", "Data": "", "Labels": { "team": "ops" } }),
        json!({ "Name": "app", "Data": "not base64!" }),
        json!({ "Data": "" }),
    ];
    for body in cases {
        let resp = client.post(&url).json(&body).send().await.unwrap();
        assert_eq!(resp.status(), 400, "body {body}");
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["response"], 400);
        assert_eq!(error["cause"], "bad parameter");
    }

    let resp = client.post(&url).body("{not json").send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_conflict_is_409() {
    let (base, _engine) = server_with(&["app"]).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/libpod/configmaps/create"))
        .json(&json!({ "Name": "app", "Data": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["cause"], "configmap name in use");
}

#[tokio::test]
async fn libpod_and_compat_listings() {
    let (base, _engine) = server_with(&["alpha", "beta"]).await;
    let client = reqwest::Client::new();

    let libpod: Value = client
        .get(format!("{base}/libpod/configmaps/json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let libpod = libpod.as_array().unwrap();
    assert_eq!(libpod.len(), 2);
    assert_eq!(libpod[0]["Spec"]["Name"], "alpha");
    assert!(libpod[0].get("Version").is_none());

    let compat: Value = client
        .get(format!("{base}/configmaps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let compat = compat.as_array().unwrap();
    assert_eq!(compat.len(), 2);
    assert_eq!(compat[1]["Spec"]["Name"], "beta");
    assert_eq!(compat[1]["Version"]["Index"], 1);
    assert_eq!(compat[1]["ID"], libpod[1]["ID"]);
}

#[tokio::test]
async fn list_filters_come_from_query() {
    let (base, _engine) = server_with(&["alpha", "beta", "gamma"]).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/libpod/configmaps/json");

    let filters = json!({ "name": ["^ga"] }).to_string();
    let listed: Value = client
        .get(&url)
        .query(&[("filters", filters)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["Spec"]["Name"], "gamma");

    for bad in [json!({ "bogus": ["x"] }).to_string(), "not json".to_string()] {
        let resp = client.get(&url).query(&[("filters", bad)]).send().await.unwrap();
        assert_eq!(resp.status(), 400);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["cause"], "invalid filter");
    }
}

#[tokio::test]
async fn inspect_found_and_missing() {
    let (base, _engine) = server_with(&["app"]).await;
    let client = reqwest::Client::new();

    let report: Value = client
        .get(format!("{base}/libpod/configmaps/app/json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["Spec"]["Name"], "app");
    assert_eq!(report["Spec"]["Driver"]["Name"], "memory");
    assert!(report["CreatedAt"].is_string());

    let compat: Value = client
        .get(format!("{base}/configmaps/app"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(compat["Version"]["Index"], 1);

    let resp = client
        .get(format!("{base}/libpod/configmaps/missing/json"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["cause"], "no such configmap");
    assert_eq!(error["response"], 404);
}

#[tokio::test]
async fn delete_by_name_and_all() {
    let (base, engine) = server_with(&["a", "b", "c"]).await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{base}/libpod/configmaps/a"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .delete(format!("{base}/configmaps/a"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{base}/libpod/configmaps/ignored?all=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(engine.manager().list().unwrap().is_empty());

    // Nothing left, still a success.
    let resp = client
        .delete(format!("{base}/libpod/configmaps/ignored?all=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn update_routes_are_not_implemented() {
    let (base, engine) = server_with(&["app"]).await;
    let client = reqwest::Client::new();

    for path in ["libpod/configmaps/app/update", "configmaps/app/update"] {
        let resp = client
            .post(format!("{base}/{path}"))
            .body("new data")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 501);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["response"], 501);
    }
    assert_eq!(engine.manager().lookup_data("app").unwrap().1, b"app");
}

#[tokio::test]
async fn route_names_cannot_be_created() {
    let (base, engine) = server_with(&[]).await;
    let client = reqwest::Client::new();

    for name in ["json", "create"] {
        let resp = client
            .post(format!("{base}/libpod/configmaps/create"))
            .json(&json!({ "Name": name, "Data": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "name {name}");
    }
    assert!(engine.manager().list().unwrap().is_empty());
}
