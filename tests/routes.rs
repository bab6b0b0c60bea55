use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use hubcrm::auth::AuthenticatedUser;
use hubcrm::models::config::{AttendanceConfig, ServerConfig};
use hubcrm::repository::DieselRepository;
use hubcrm::{SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE, SERVICE_SALES_ROLE, configure_app};
use serde_json::{Value, json};

mod common;

const SECRET: &str = "test-secret";

fn server_config(test_db: &common::TestDb) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        database_url: test_db.url().to_string(),
        secret: SECRET.into(),
        auth_service_url: "http://localhost:8000".into(),
        assets_dir: "./assets".into(),
        attendance: AttendanceConfig::default(),
    }
}

fn token(email: &str, roles: &[&str]) -> String {
    AuthenticatedUser {
        sub: email.into(),
        email: email.into(),
        hub_id: 1,
        name: "Test User".into(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 4_102_444_800,
    }
    .to_jwt(SECRET)
    .unwrap()
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! app {
    ($test_db:expr) => {
        test::init_service(App::new().configure(configure_app(
            DieselRepository::new($test_db.pool()),
            server_config(&$test_db),
        )))
        .await
    };
}

#[actix_web::test]
async fn requests_without_credentials_are_rejected() {
    let test_db = common::TestDb::new("test_routes_unauthenticated.db");
    let app = app!(test_db);

    let req = test::TestRequest::get().uri("/api/v1/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header((AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn first_request_registers_the_employee() {
    let test_db = common::TestDb::new("test_routes_me.db");
    let app = app!(test_db);
    let jwt = token("Jane@Example.com", &[SERVICE_ACCESS_ROLE]);

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .cookie(Cookie::new("token", jwt.clone()))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["email"], "jane@example.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header(bearer(&jwt))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["id"], first["id"]);
}

#[actix_web::test]
async fn leave_types_need_hr() {
    let test_db = common::TestDb::new("test_routes_leave_types.db");
    let app = app!(test_db);
    let body = json!({ "name": "Annual", "days_per_year": 20 });

    let req = test::TestRequest::post()
        .uri("/api/v1/leave/types")
        .insert_header(bearer(&token("staff@example.com", &[SERVICE_ACCESS_ROLE])))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let hr = token("hr@example.com", &[SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE]);
    let req = test::TestRequest::post()
        .uri("/api/v1/leave/types")
        .insert_header(bearer(&hr))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/leave/types")
        .insert_header(bearer(&hr))
        .set_json(json!({ "name": "Sabbatical", "days_per_year": 400 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/v1/leave/types")
        .insert_header(bearer(&token("staff@example.com", &[SERVICE_ACCESS_ROLE])))
        .to_request();
    let types: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(types.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn invoice_lifecycle_over_http() {
    let test_db = common::TestDb::new("test_routes_invoices.db");
    let app = app!(test_db);
    let sales = token("sales@example.com", &[SERVICE_ACCESS_ROLE, SERVICE_SALES_ROLE]);

    let req = test::TestRequest::get()
        .uri("/api/v1/invoices/999")
        .insert_header(bearer(&sales))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/invoices")
        .insert_header(bearer(&sales))
        .set_json(json!({
            "customer_name": "Acme",
            "items": [{ "description": "Consulting", "quantity": 2, "unit_price": 5000 }],
            "issue_date": "2099-01-01",
            "due_date": "2099-01-31"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["number"], "INV-000001");
    assert_eq!(invoice["status"], "Draft");
    let id = invoice["id"].as_i64().unwrap();
    let public_uri = format!(
        "/api/v1/public/invoices/{}",
        invoice["public_id"].as_str().unwrap()
    );

    // Drafts are not visible to customers yet.
    let req = test::TestRequest::get().uri(&public_uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/invoices/{id}/issue"))
        .insert_header(bearer(&sales))
        .to_request();
    let issued: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(issued["status"], "Unpaid");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/invoices/{id}/payments"))
        .insert_header(bearer(&sales))
        .set_json(json!({ "amount": 0, "method": "Cash" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/invoices/{id}/payments"))
        .insert_header(bearer(&sales))
        .set_json(json!({ "amount": 50000, "method": "Cash" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/invoices/{id}/payments"))
        .insert_header(bearer(&sales))
        .set_json(json!({ "amount": 10000, "method": "BankTransfer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri(&public_uri).to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public["number"], "INV-000001");
    assert_eq!(public["status"], "Paid");
    assert_eq!(public["balance_due"], 0);
}
