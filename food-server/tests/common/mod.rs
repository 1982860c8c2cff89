//! Helpers for driving the full router in-process with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use food_server::auth::JwtService;
use food_server::db::memory::MemoryStore;
use food_server::{AppState, api};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // oneshot

pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

pub struct TestApp {
    pub router: axum::Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::with_store(
            Arc::new(MemoryStore::new()),
            JwtService::new(TEST_SECRET, 60),
        );
        Self {
            router: api::build_app(state),
        }
    }

    pub async fn raw(&self, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Bytes) {
        let resp = self.router.clone().oneshot(req).await.expect("oneshot failed");
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .into_body()
            .collect()
            .await
            .expect("body collect failed")
            .to_bytes();
        (status, headers, body)
    }

    /// Send a JSON request and parse the JSON reply
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, _, bytes) = self.raw(req).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not valid JSON")
        };
        (status, json)
    }

    pub async fn sign_up(&self, nickname: &str, role: &str) {
        let (status, body) = self
            .call(
                "POST",
                "/api/sign-up",
                None,
                Some(json!({ "nickname": nickname, "password": "pw-1234", "userType": role })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {body}");
    }

    pub async fn sign_in(&self, nickname: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/sign-in",
                None,
                Some(json!({ "nickname": nickname, "password": "pw-1234" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Sign up and sign in, returning the bearer token
    pub async fn user(&self, nickname: &str, role: &str) -> String {
        self.sign_up(nickname, role).await;
        self.sign_in(nickname).await
    }

    /// Create a category and a menu in it, returning `(category_id, menu_id)`
    pub async fn menu(&self, owner: &str, name: &str, price: i64, quantity: i32) -> (i64, i64) {
        let (status, body) = self
            .call(
                "POST",
                "/api/categories",
                Some(owner),
                Some(json!({ "name": "Korean" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "category failed: {body}");
        let category_id = body["data"]["categoryId"].as_i64().unwrap();

        let (status, body) = self
            .call(
                "POST",
                &format!("/api/categories/{category_id}/menus"),
                Some(owner),
                Some(json!({ "name": name, "price": price, "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "menu failed: {body}");
        (category_id, body["data"]["menuId"].as_i64().unwrap())
    }

    pub async fn menu_detail(&self, category_id: i64, menu_id: i64) -> Value {
        let (status, body) = self
            .call(
                "GET",
                &format!("/api/categories/{category_id}/menus/{menu_id}"),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "menu detail failed: {body}");
        body["data"].clone()
    }

    pub async fn order(&self, customer: &str, menu_id: i64, quantity: i32) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/api/orders",
            Some(customer),
            Some(json!({ "menuId": menu_id, "quantity": quantity })),
        )
        .await
    }
}
