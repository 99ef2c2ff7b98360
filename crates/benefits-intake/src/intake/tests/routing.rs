use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::intake::domain::NewApplicant;
use crate::intake::router::create_applicant_handler;
use crate::intake::IntakeService;

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

async fn create_applicant(router: &axum::Router) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/applicants",
            json!({ "email": "applicant@example.com" }),
        ))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    body["applicant_id"]
        .as_str()
        .expect("applicant id")
        .to_string()
}

#[tokio::test]
async fn create_applicant_returns_created_view() {
    let harness = harness();
    let router = router(&harness);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/applicants",
            json!({ "email": "applicant@example.com", "preferred_locale": "es-us" }),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["applicant_id"], "applicant-000001");
    assert_eq!(body["email"], "applicant@example.com");
    assert_eq!(body["preferred_locale"], "es-US");
}

#[tokio::test]
async fn create_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(IntakeService::new(
        Arc::new(UnavailableRepository),
        questions(),
        aws_storage(),
        email_client(Arc::new(RecordingTransport::default())),
    ));

    let response = create_applicant_handler(State(service), axum::Json(NewApplicant::default())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("database offline"));
}

#[tokio::test]
async fn question_view_uses_accept_language() {
    let harness = harness();
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/applicants/{applicant_id}/questions/1"))
                .header(header::ACCEPT_LANGUAGE, "fr-CA, es;q=0.8, en;q=0.5")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["locale"], "es-US");
    assert_eq!(body["question_text"], "¿Cuál es su nombre?");
    assert_eq!(body["answered"], false);
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn answer_route_saves_valid_text() {
    let harness = harness();
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/applicants/{applicant_id}/questions/1/answer"),
            json!({ "value": "Maria" }),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "saved");
    assert_eq!(body["question"]["value"], "Maria");

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/applicants/{applicant_id}/questions/1"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    let body = read_json_body(response).await;
    assert_eq!(body["value"], "Maria");
    assert_eq!(body["answered"], true);
}

#[tokio::test]
async fn answer_route_rejects_invalid_text_with_localized_errors() {
    let harness = harness();
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let mut request = json_request(
        "POST",
        &format!("/api/v1/applicants/{applicant_id}/questions/1/answer"),
        json!({ "value": "this name is far too long" }),
    );
    request
        .headers_mut()
        .insert(header::ACCEPT_LANGUAGE, "es-US".parse().expect("header value"));

    let response = router.oneshot(request).await.expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(
        body["question"]["errors"],
        json!(["Debe contener como máximo 10 caracteres."])
    );
}

#[tokio::test]
async fn unknown_applicant_returns_not_found() {
    let harness = harness();
    let router = router(&harness);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/applicants/applicant-424242/questions/1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_question_returns_not_found() {
    let harness = harness();
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/applicants/{applicant_id}/questions/77/answer"),
            json!({ "value": "anything" }),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn questions_route_lists_definitions_in_id_order() {
    let harness = harness();

    let response = router(&harness)
        .oneshot(
            Request::builder()
                .uri("/api/v1/questions")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let ids: Vec<u64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|definition| definition["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn upload_route_returns_signed_fields() {
    let harness = harness();
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/applicants/{applicant_id}/uploads"),
            json!({
                "file_name": "paystub.pdf",
                "success_redirect": "https://intake.example.gov/done"
            }),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["vendor"], "aws");
    assert_eq!(body["action_url"], "https://intake-files.s3.us-east-1.amazonaws.com/");
    assert_eq!(body["fields"]["key"], "applicant-000001/paystub.pdf");
    assert_eq!(body["fields"]["x-amz-algorithm"], "AWS4-HMAC-SHA256");
    assert!(body["fields"]["x-amz-signature"].is_string());
}

#[tokio::test]
async fn azure_routes_return_not_implemented() {
    let harness = harness_with(azure_storage(), RecordingTransport::default());
    let router = router(&harness);
    let applicant_id = create_applicant(&router).await;

    let upload = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/applicants/{applicant_id}/uploads"),
            json!({ "file_name": "id.png", "success_redirect": "https://example.gov" }),
        ))
        .await
        .expect("router response");
    assert_eq!(upload.status(), StatusCode::NOT_IMPLEMENTED);

    let file = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/files/applicant-000001/id.png")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(file.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn file_route_returns_display_url() {
    let harness = harness();

    let response = router(&harness)
        .oneshot(
            Request::builder()
                .uri("/api/v1/files/applicant-000001/id.png")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["file_key"], "applicant-000001/id.png");
    assert_eq!(
        body["url"],
        "https://intake-files.s3.us-east-1.amazonaws.com/applicant-000001/id.png"
    );
}

#[tokio::test]
async fn notification_route_accepts_and_reports_gateway_failures() {
    let harness = harness();
    let response = router(&harness)
        .oneshot(json_request(
            "POST",
            "/api/v1/notifications/email",
            json!({
                "recipients": ["case@example.gov"],
                "subject": "Application received",
                "body": "Thank you."
            }),
        ))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["recipients"], 1);

    let failing = harness_with(
        aws_storage(),
        RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        },
    );
    let response = router(&failing)
        .oneshot(json_request(
            "POST",
            "/api/v1/notifications/email",
            json!({
                "recipients": ["case@example.gov"],
                "subject": "Application received",
                "body": "Thank you."
            }),
        ))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
