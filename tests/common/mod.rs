#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{Map, Value};
use tower::ServiceExt;

use jobly_api::app::{router, AppState};
use jobly_api::auth::{Identity, TokenKeys};
use jobly_api::database::{DatabaseError, JsonRow, QueryExecutor};

pub const TEST_SECRET: &str = "secret-test";

/// One statement as the services issued it
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl RecordedQuery {
    /// SQL with runs of whitespace collapsed to single spaces
    pub fn normalized(&self) -> String {
        self.sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// In-memory executor: answers each statement with the next queued row set
/// (or no rows once the queue is drained) and records what it was asked.
#[derive(Default)]
pub struct FakeExecutor {
    responses: Mutex<VecDeque<Vec<JsonRow>>>,
    recorded: Mutex<Vec<RecordedQuery>>,
}

impl FakeExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the rows returned by the next unanswered statement
    pub fn respond(&self, rows: Vec<Value>) -> &Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("fake rows must be JSON objects, got {}", other),
            })
            .collect();
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> RecordedQuery {
        self.queries().pop().expect("no statement was executed")
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn fetch_all(&self, query: &str, params: &[Value]) -> Result<Vec<JsonRow>, DatabaseError> {
        self.recorded.lock().unwrap().push(RecordedQuery {
            sql: query.to_string(),
            params: params.to_vec(),
        });
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<FakeExecutor>,
    pub keys: TokenKeys,
}

impl TestApp {
    pub fn new() -> Self {
        let db = FakeExecutor::new();
        let keys = TokenKeys::new(TEST_SECRET, 1);
        let router = router(AppState::new(db.clone(), keys.clone()));
        Self { router, db, keys }
    }

    pub fn token(&self, username: &str, is_admin: bool) -> String {
        self.keys
            .create_token(&Identity::new(username, is_admin))
            .expect("failed to sign test token")
    }

    pub fn admin_token(&self) -> String {
        self.token("admin", true)
    }

    pub fn user_token(&self) -> String {
        self.token("u1", false)
    }

    /// Send one request through the router and return status plus parsed body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, token, body).await
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = router.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn company_row(handle: &str, name: &str, num_employees: i64) -> Value {
    let mut row = Map::new();
    row.insert("handle".into(), handle.into());
    row.insert("name".into(), name.into());
    row.insert("description".into(), format!("Desc {}", name).into());
    row.insert("numEmployees".into(), num_employees.into());
    row.insert("logoUrl".into(), format!("http://{}.img", handle).into());
    Value::Object(row)
}

pub fn job_row(id: i64, title: &str, salary: i64, equity: &str, company_handle: &str) -> Value {
    let mut row = Map::new();
    row.insert("id".into(), id.into());
    row.insert("title".into(), title.into());
    row.insert("salary".into(), salary.into());
    row.insert("equity".into(), equity.into());
    row.insert("companyHandle".into(), company_handle.into());
    Value::Object(row)
}
