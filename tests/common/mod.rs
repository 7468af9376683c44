#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Canned failure for one endpoint: status plus raw body.
#[derive(Clone, Debug)]
pub struct Failure {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug)]
pub struct BackendData {
    pub foods: Value,
    pub targets: Value,
    pub logs: Vec<Value>,
    /// Returned verbatim from `/get_summary` when set.
    pub summary: Option<Value>,
    pub hits: HashMap<&'static str, usize>,
    pub bodies: Vec<(&'static str, Value)>,
    pub failures: HashMap<&'static str, Failure>,
    pub delays: HashMap<&'static str, Duration>,
}

impl Default for BackendData {
    fn default() -> Self {
        Self {
            foods: json!({
                "Chicken Breast": {"StandardAmount": 100, "StandardUnit": "100g",
                    "Calories": 165, "Protein": 31, "Fat": 3.6, "Carbs": 0},
                "Banana": {"StandardAmount": 1, "StandardUnit": "unit",
                    "Calories": 105, "Protein": 1.3, "Fat": 0.3, "Carbs": 27},
                "Oats": {"StandardAmount": 81, "StandardUnit": "cup",
                    "Calories": 150, "Protein": 5, "Fat": 3, "Carbs": 27}
            }),
            targets: json!({"Calories": 2000, "Protein": 150, "Fat": 70, "Carbs": 250}),
            logs: Vec::new(),
            summary: None,
            hits: HashMap::new(),
            bodies: Vec::new(),
            failures: HashMap::new(),
            delays: HashMap::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Backend {
    data: Arc<Mutex<BackendData>>,
}

impl Backend {
    pub fn with<R>(&self, f: impl FnOnce(&mut BackendData) -> R) -> R {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    pub fn hits(&self, endpoint: &str) -> usize {
        self.with(|data| data.hits.get(endpoint).copied().unwrap_or(0))
    }

    pub fn total_hits(&self) -> usize {
        self.with(|data| data.hits.values().sum())
    }

    pub fn bodies(&self, endpoint: &str) -> Vec<Value> {
        self.with(|data| {
            data.bodies
                .iter()
                .filter(|(name, _)| *name == endpoint)
                .map(|(_, body)| body.clone())
                .collect()
        })
    }

    pub fn fail(&self, endpoint: &'static str, status: StatusCode, body: &str) {
        self.with(|data| {
            data.failures.insert(
                endpoint,
                Failure {
                    status,
                    body: body.to_string(),
                },
            )
        });
    }

    pub fn delay(&self, endpoint: &'static str, delay: Duration) {
        self.with(|data| data.delays.insert(endpoint, delay));
    }

    /// Count the hit, record the body, then apply any delay or failure.
    async fn enter(&self, endpoint: &'static str, body: Option<&Value>) -> Option<Response> {
        let (delay, failure) = self.with(|data| {
            *data.hits.entry(endpoint).or_default() += 1;
            if let Some(body) = body {
                data.bodies.push((endpoint, body.clone()));
            }
            (
                data.delays.get(endpoint).copied(),
                data.failures.get(endpoint).cloned(),
            )
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map(|failure| (failure.status, failure.body).into_response())
    }
}

pub struct FakeBackend {
    pub api_base: String,
    pub backend: Backend,
}

pub async fn spawn_backend() -> FakeBackend {
    spawn_with(BackendData::default()).await
}

pub async fn spawn_with(data: BackendData) -> FakeBackend {
    let backend = Backend {
        data: Arc::new(Mutex::new(data)),
    };
    let app = Router::new()
        .route("/api/get_summary", get(get_summary))
        .route("/api/get_foods", get(get_foods))
        .route("/api/get_targets", get(get_targets))
        .route("/api/log_meal", post(log_meal))
        .route("/api/set_targets", post(set_targets))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        api_base: format!("http://{addr}/api"),
        backend,
    }
}

/// A base URL nothing listens on.
pub fn dead_api_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}

async fn get_summary(State(backend): State<Backend>) -> Response {
    if let Some(response) = backend.enter("get_summary", None).await {
        return response;
    }
    let body = backend.with(|data| {
        if let Some(summary) = &data.summary {
            return summary.clone();
        }
        let mut totals = Map::new();
        for key in ["Calories", "Protein", "Fat", "Carbs"] {
            let sum: f64 = data
                .logs
                .iter()
                .filter_map(|entry| entry[key].as_f64())
                .sum();
            totals.insert(key.to_string(), json!(sum));
        }
        json!({"totals": totals, "targets": data.targets, "logs": data.logs})
    });
    Json(body).into_response()
}

async fn get_foods(State(backend): State<Backend>) -> Response {
    if let Some(response) = backend.enter("get_foods", None).await {
        return response;
    }
    Json(backend.with(|data| data.foods.clone())).into_response()
}

async fn get_targets(State(backend): State<Backend>) -> Response {
    if let Some(response) = backend.enter("get_targets", None).await {
        return response;
    }
    Json(backend.with(|data| data.targets.clone())).into_response()
}

async fn log_meal(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    if let Some(response) = backend.enter("log_meal", Some(&body)).await {
        return response;
    }
    let name = body["food_name"].as_str().unwrap_or_default().to_string();
    let amount = body["amount"].as_f64().unwrap_or_default();

    backend.with(|data| {
        let Some(food) = data.foods.get(&name).cloned() else {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Food not found"})),
            )
                .into_response();
        };
        let factor = amount / food["StandardAmount"].as_f64().unwrap_or(1.0);
        let scaled = |key: &str| food[key].as_f64().unwrap_or_default() * factor;
        let calories = scaled("Calories");
        data.logs.push(json!({
            "Date": Local::now().format("%Y-%m-%d").to_string(),
            "Time": Local::now().format("%H:%M:%S").to_string(),
            "Food": name,
            "Amount": amount,
            "Unit": food["StandardUnit"],
            "Calories": calories,
            "Protein": scaled("Protein"),
            "Fat": scaled("Fat"),
            "Carbs": scaled("Carbs"),
        }));
        let message = format!("Logged {} kcal from {name}!", calories.round());
        Json(json!({"message": message})).into_response()
    })
}

async fn set_targets(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    if let Some(response) = backend.enter("set_targets", Some(&body)).await {
        return response;
    }
    backend.with(|data| data.targets = body.clone());
    Json(json!({"message": "Targets updated", "targets": body})).into_response()
}
