//! Liveness probe. Public, no database access.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Crate version the server was built from.
    pub version: &'static str,
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(|| async { Json(current()) }))
}

fn current() -> Health {
    Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_body() {
        let body = serde_json::to_value(current()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
