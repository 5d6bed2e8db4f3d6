//! Local REST document store emulator for exercising `HttpStore`.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

#[derive(Debug, Default)]
pub struct Documents {
    pub members: Value,
    pub devices: Value,
    pub logs: Value,
    pub latest: Value,
    pub fail_devices: bool,
}

pub type Shared = Arc<Mutex<Documents>>;

async fn get_members(State(db): State<Shared>) -> Json<Value> {
    Json(db.lock().unwrap().members.clone())
}

async fn get_devices(State(db): State<Shared>) -> Result<Json<Value>, (StatusCode, String)> {
    let db = db.lock().unwrap();
    if db.fail_devices {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "devices offline".to_string()));
    }
    Ok(Json(db.devices.clone()))
}

async fn get_logs(State(db): State<Shared>) -> Json<Value> {
    Json(db.lock().unwrap().logs.clone())
}

async fn post_log(State(db): State<Shared>, Json(mut body): Json<Value>) -> Json<Value> {
    let key = format!("-N{}", uuid::Uuid::new_v4().simple());
    if body.get("ts").map(|ts| ts.is_object()).unwrap_or(false) {
        body["ts"] = json!(1_700_000_000_000_i64);
    }
    let mut db = db.lock().unwrap();
    if !db.logs.is_object() {
        db.logs = Value::Object(Map::new());
    }
    if let Some(logs) = db.logs.as_object_mut() {
        logs.insert(key.clone(), body);
    }
    Json(json!({ "name": key }))
}

async fn get_latest(State(db): State<Shared>) -> Json<Value> {
    Json(db.lock().unwrap().latest.clone())
}

async fn patch_latest(State(db): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut db = db.lock().unwrap();
    if !db.latest.is_object() {
        db.latest = Value::Object(Map::new());
    }
    if let (Some(latest), Some(patch)) = (db.latest.as_object_mut(), body.as_object()) {
        for (k, v) in patch {
            latest.insert(k.clone(), v.clone());
        }
    }
    Json(body)
}

/// Start the emulator on an ephemeral port; returns its base URL.
pub async fn spawn(db: Shared) -> String {
    let app = Router::new()
        .route("/members.json", get(get_members))
        .route("/devices.json", get(get_devices))
        .route("/logs.json", get(get_logs).post(post_log))
        .route("/latest.json", get(get_latest).patch(patch_latest))
        .with_state(db);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
