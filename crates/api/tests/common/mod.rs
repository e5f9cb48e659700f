//! Test harness driving the router in memory.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use shootlogix_api::{AppState, create_router, rate_limit::LoginRateLimiter};
use shootlogix_db::{ProductionRepository, migration::Migrator, seed_default_accounts};
use shootlogix_shared::{JwtConfig, JwtService};

/// Router plus direct database access for fixtures.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub production_id: i32,
}

/// Builds an app over a migrated, seeded in-memory database.
pub async fn test_app() -> TestApp {
    let db = shootlogix_db::connect_with("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    seed_default_accounts(&db)
        .await
        .expect("Failed to seed accounts");

    let production_id = ProductionRepository::new(db.clone())
        .find_by_name("KLAS7")
        .await
        .unwrap()
        .expect("KLAS7 seeded")
        .id;

    let jwt = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-api-tests".to_string(),
        ..JwtConfig::default()
    });
    let state = AppState::new(
        db.clone(),
        jwt,
        LoginRateLimiter::new(5, Duration::from_secs(60)),
    );

    TestApp {
        router: create_router(state),
        db,
        production_id,
    }
}

impl TestApp {
    /// Sends a request and returns status and JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes, _) = self.send_raw(method, uri, token, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Sends a request and returns status, body bytes and headers.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, bytes, headers)
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, nickname: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "nickname": nickname, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login("ADMIN", "@dm1NKL").await
    }

    pub async fn unit_token(&self) -> String {
        self.login("UNIT", "UN1Tkl@").await
    }

    pub async fn transport_token(&self) -> String {
        self.login("TRANSPORT", "Tr@nsp0kl").await
    }

    pub async fn reader_token(&self) -> String {
        self.login("READER", "Re@derKL1").await
    }

    /// `/api/productions/{id}` followed by `path`.
    pub fn prod(&self, path: &str) -> String {
        format!("/api/productions/{}{path}", self.production_id)
    }
}
