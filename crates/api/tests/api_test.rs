//! End-to-end tests of the HTTP API over an in-memory database.

mod common;

use axum::http::{Method, StatusCode, header};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use common::{TestApp, test_app};

fn decimal(value: &Value) -> Decimal {
    serde_json::from_value(value.clone()).unwrap()
}

/// Creates a boat function, a boat at 100/day and a one-week assignment.
async fn seed_assignment(app: &TestApp, token: &str) -> (i64, i64, i64) {
    let (status, function) = app
        .send(
            Method::POST,
            &app.prod("/boat-functions"),
            Some(token),
            Some(json!({ "name": "CAMERA BOAT", "function_group": "UNIT A" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{function}");

    let (status, boat) = app
        .send(
            Method::POST,
            &app.prod("/boats"),
            Some(token),
            Some(json!({ "name": "Blue Marlin", "vendor": "MARINA", "daily_rate_estimate": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{boat}");

    let (status, assignment) = app
        .send(
            Method::POST,
            &app.prod("/assignments"),
            Some(token),
            Some(json!({
                "function_id": function["id"],
                "resource_id": boat["id"],
                "start_date": "2026-03-01",
                "end_date": "2026-03-07",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{assignment}");

    (
        function["id"].as_i64().unwrap(),
        boat["id"].as_i64().unwrap(),
        assignment["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_login_failures_and_rate_limit() {
    let app = test_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "nickname": "  ", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FIELDS");

    for _ in 0..4 {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "nickname": "ADMIN", "password": "wrong" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
    }

    // Five failures used up, even the right password is refused now.
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "nickname": "ADMIN", "password": "@dm1NKL" })),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "RATE_LIMITED");
}

#[tokio::test]
async fn test_refresh_and_me() {
    let app = test_app().await;
    let (status, login) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "nickname": "UNIT", "password": "UN1Tkl@" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["nickname"], "UNIT");

    let (status, refreshed) = app
        .send(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": login["refresh_token"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = refreshed["access_token"].as_str().unwrap();

    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["memberships"][0]["production_name"], "KLAS7");
    assert_eq!(me["memberships"][0]["role"], "UNIT");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/logout",
            None,
            Some(json!({ "refresh_token": login["refresh_token"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": login["refresh_token"] })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_missing_and_invalid_token() {
    let app = test_app().await;

    let (status, body) = app.send(Method::GET, &app.prod("/boats"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NO_TOKEN");

    let (status, body) = app
        .send(Method::GET, &app.prod("/boats"), Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_reader_can_read_but_not_write() {
    let app = test_app().await;
    let token = app.reader_token().await;

    let (status, _) = app.send(Method::GET, &app.prod("/boats"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::POST,
            &app.prod("/boats"),
            Some(&token),
            Some(json!({ "name": "Sneaky" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["message"], "Read-only access: you cannot modify data");
}

#[tokio::test]
async fn test_transport_role_is_limited_to_its_tabs() {
    let app = test_app().await;
    let token = app.transport_token().await;

    let (status, _) = app
        .send(Method::GET, &app.prod("/transport-vehicles"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, &app.prod("/helpers"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Your role (TRANSPO) does not have access to LABOUR");

    let (status, _) = app
        .send(Method::GET, &app.prod("/export/labour/csv"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_production_membership_and_writes() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let unit = app.unit_token().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/productions",
            Some(&unit),
            Some(json!({ "name": "OTHER" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only ADMIN can create or modify productions");

    let (status, other) = app
        .send(
            Method::POST,
            "/api/productions",
            Some(&admin),
            Some(json!({ "name": "OTHER" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/productions/{}/boats", other["id"]);
    let (status, body) = app.send(Method::GET, &uri, Some(&unit), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NOT_MEMBER");

    let (status, list) = app.send(Method::GET, "/api/productions", Some(&unit), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(Method::GET, "/api/productions/9999/boats", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignment_lifecycle_with_undo() {
    let app = test_app().await;
    let unit = app.unit_token().await;
    let admin = app.admin_token().await;
    let (_, _, assignment_id) = seed_assignment(&app, &unit).await;

    let (status, list) = app
        .send(Method::GET, &app.prod("/assignments"), Some(&unit), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["working_days"], 6);
    assert_eq!(list[0]["function_name"], "CAMERA BOAT");
    assert_eq!(decimal(&list[0]["amount_estimate"]), dec!(600));

    let (status, updated) = app
        .send(
            Method::PUT,
            &app.prod(&format!("/assignments/{assignment_id}")),
            Some(&unit),
            Some(json!({ "end_date": "2026-03-14" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["working_days"], 12);

    let (status, body) = app
        .send(
            Method::PUT,
            &app.prod(&format!("/assignments/{assignment_id}")),
            Some(&unit),
            Some(json!({ "start_date": "2026-04-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // History and undo sit outside every tab, so only ADMIN reaches them.
    let (status, _) = app
        .send(Method::GET, &app.prod("/history"), Some(&unit), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, history) = app
        .send(Method::GET, &app.prod("/history?limit=10"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(Method::POST, &app.prod("/undo"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Undo successful");
    assert_eq!(body["restored"]["end_date"], "2026-03-07");

    let (_, detail) = app
        .send(
            Method::GET,
            &app.prod(&format!("/assignments/{assignment_id}")),
            Some(&unit),
            None,
        )
        .await;
    assert_eq!(detail["working_days"], 6);

    app.send(Method::POST, &app.prod("/undo"), Some(&admin), None).await;
    let (_, body) = app
        .send(Method::POST, &app.prod("/undo"), Some(&admin), None)
        .await;
    assert_eq!(body["message"], "Nothing to undo");
}

#[tokio::test]
async fn test_clear_function_assignments() {
    let app = test_app().await;
    let unit = app.unit_token().await;
    let (function_id, _, _) = seed_assignment(&app, &unit).await;

    let (status, body) = app
        .send(
            Method::DELETE,
            &app.prod(&format!("/assignments/function/{function_id}")),
            Some(&unit),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (_, list) = app
        .send(Method::GET, &app.prod("/assignments"), Some(&unit), None)
        .await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_boat_csv_export() {
    let app = test_app().await;
    let unit = app.unit_token().await;
    seed_assignment(&app, &unit).await;

    let (status, bytes, headers) = app
        .send_raw(Method::GET, &app.prod("/export/csv"), Some(&unit), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=KLAS7_BOATS_"));

    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Function,Group,Boat,Vendor,Start,End,Working Days,Rate Estimate,Amount Estimate,Amount Actual"
    );
    assert!(lines[1].starts_with("CAMERA BOAT,UNIT A,Blue Marlin,MARINA,2026-03-01,2026-03-07,6,"));
    assert!(lines[2].starts_with("TOTAL,"));

    let (status, json) = app
        .send(Method::GET, &app.prod("/export/json"), Some(&unit), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&json["total_estimate"]), dec!(600));
}

#[tokio::test]
async fn test_budget_report_and_global_export() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    seed_assignment(&app, &admin).await;

    let (status, line) = app
        .send(
            Method::POST,
            &app.prod("/budget/lines"),
            Some(&admin),
            Some(json!({ "name": "INSURANCE", "qty_estimate": 1, "unit_price_estimate": 1000 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["source"], "manual");

    let (status, report) = app
        .send(Method::GET, &app.prod("/budget"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(report["by_department"]["BOATS"].is_object());
    assert_eq!(decimal(&report["by_department"]["BOATS"]["total_estimate"]), dec!(600));

    let (status, bytes, _) = app
        .send_raw(Method::GET, &app.prod("/export/budget-global"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Department,Name,Boat/Resource,"));
    assert!(text.contains("SUBTOTAL BOATS"));
    assert!(text.lines().last().unwrap().starts_with("GRAND TOTAL,"));

    let (status, _) = app
        .send(
            Method::DELETE,
            &app.prod(&format!("/budget/lines/{}", line["id"])),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_locked_location_cells_reject_changes() {
    let app = test_app().await;
    let unit = app.unit_token().await;
    let cell = json!({ "location_name": "BEACH", "date": "2026-03-20", "status": "F" });

    let (status, _) = app
        .send(Method::POST, &app.prod("/location-schedules"), Some(&unit), Some(cell.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::PUT,
            &app.prod("/location-schedules/lock"),
            Some(&unit),
            Some(json!({ "dates": ["2026-03-20"], "locked": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (status, _) = app
        .send(Method::POST, &app.prod("/location-schedules"), Some(&unit), Some(cell))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let unit = app.unit_token().await;
    let new_user = json!({ "nickname": "CAPTAIN", "password": "s3cret!" });

    let (status, _) = app
        .send(Method::GET, "/api/admin/users", Some(&unit), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .send(Method::POST, "/api/admin/users", Some(&admin), Some(new_user.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nickname"], "CAPTAIN");

    let (status, _) = app
        .send(Method::POST, "/api/admin/users", Some(&admin), Some(new_user))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/admin/users",
            Some(&admin),
            Some(json!({ "nickname": "X", "password": "s3cret!" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let captain = app.login("CAPTAIN", "s3cret!").await;
    let (status, body) = app
        .send(Method::GET, &app.prod("/boats"), Some(&captain), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NOT_MEMBER");
}

#[tokio::test]
async fn test_working_days_calculator() {
    let app = test_app().await;
    let token = app.reader_token().await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/working-days?start=2026-03-01&end=2026-03-07",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_days"], 6);

    let (_, body) = app
        .send(Method::GET, "/api/working-days?start=bad", Some(&token), None)
        .await;
    assert_eq!(body["working_days"], 0);
}

#[tokio::test]
async fn test_malformed_bodies_get_error_json() {
    let app = test_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "nickname": null, "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].is_string());

    let unit = app.unit_token().await;
    let (status, body) = app
        .send(
            Method::POST,
            &app.prod("/boats"),
            Some(&unit),
            Some(json!({ "name": "ORCA", "daily_rate_estimate": "cheap" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_out_of_range_rate_is_rejected() {
    let app = test_app().await;
    let unit = app.unit_token().await;

    let (status, body) = app
        .send(
            Method::POST,
            &app.prod("/boats"),
            Some(&unit),
            Some(json!({ "name": "ORCA", "daily_rate_estimate": 7e28 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
