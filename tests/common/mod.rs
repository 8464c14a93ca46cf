#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bawk_storefront::admin::AdminStore;
use bawk_storefront::config::StoreConfig;
use bawk_storefront::operator::Operator;
use bawk_storefront::Storefront;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn storefront(server: &MockServer) -> Arc<Storefront> {
    init_tracing();
    let config = StoreConfig::new(&server.uri(), "test_anon_key").unwrap();
    Arc::new(Storefront::new(config).unwrap())
}

/// Operator that records alerts and prompts and answers prompts with `answer`
pub struct RecordingOperator {
    answer: bool,
    pub alerts: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingOperator {
    pub fn confirming() -> Arc<Self> {
        Arc::new(Self {
            answer: true,
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            answer: false,
            alerts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Operator for RecordingOperator {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

pub fn admin(
    server: &MockServer,
    operator: Arc<RecordingOperator>,
) -> AdminStore<Storefront> {
    let store = storefront(server);
    let options = store.options().clone();
    AdminStore::new(store, operator, &options)
}

/// Serve `rows` for a newest-first read of `table`
pub async fn mount_table(server: &MockServer, table: &str, rows: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_all_tables(server: &MockServer, products: Value, categories: Value) {
    mount_table(server, "products", products).await;
    mount_table(
        server,
        "orders",
        json!([
            { "id": 10, "email": "ada@example.com", "status": "Pending", "total_amount": "100",
              "items": [], "created_at": "2024-05-02T10:00:00+00:00" },
            { "id": 11, "email": "grace@example.com", "status": "Completed", "total_amount": "abc",
              "items": [], "created_at": "2024-05-01T10:00:00+00:00" }
        ]),
    )
    .await;
    mount_table(server, "categories", categories).await;
    mount_table(
        server,
        "users",
        json!([
            { "id": "u1", "email": "ada@example.com", "full_name": "Ada Lovelace", "role": "admin" }
        ]),
    )
    .await;
}

pub fn session_json(role: Option<&str>) -> Value {
    let metadata = match role {
        Some(role) => json!({ "role": role, "full_name": "Ada Lovelace" }),
        None => json!({}),
    };
    json!({
        "access_token": "test_access_token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "test_refresh_token",
        "user": {
            "id": "test_user_id",
            "email": "ada@example.com",
            "role": "authenticated",
            "user_metadata": metadata
        }
    })
}
