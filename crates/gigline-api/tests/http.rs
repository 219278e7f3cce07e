use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use gigline_api::router;
use gigline_api::state::AppStateInner;
use gigline_chat::InMemoryDirectory;
use gigline_types::api::Claims;
use gigline_types::models::{AccountType, ActorId, ActorRecord, Language, RoleFlags};

const SECRET: &str = "test-secret";

struct TestApp {
    app: Router,
    provider: ActorId,
    customer: ActorId,
    other_customer: ActorId,
}

fn flags(is_client: bool, is_freelance: bool) -> Option<RoleFlags> {
    Some(RoleFlags {
        is_client,
        is_freelance,
    })
}

fn setup() -> TestApp {
    let provider = ActorId::new();
    let customer = ActorId::new();
    let other_customer = ActorId::new();

    let directory = InMemoryDirectory::from_records([
        ActorRecord {
            id: provider,
            display_name: "Provider".into(),
            roles: flags(false, true),
            account_type: None,
        },
        ActorRecord {
            id: customer,
            display_name: "Customer".into(),
            roles: flags(true, false),
            account_type: None,
        },
        // Legacy record without flags.
        ActorRecord {
            id: other_customer,
            display_name: "Legacy customer".into(),
            roles: None,
            account_type: Some(AccountType::Customer),
        },
    ]);

    let state = Arc::new(AppStateInner::new(directory, SECRET.into(), Language::En));
    TestApp {
        app: router(state),
        provider,
        customer,
        other_customer,
    }
}

fn token(sub: ActorId, lang: Option<&str>) -> String {
    let claims = Claims {
        sub,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        lang: lang.map(str::to_string),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    as_actor: Option<ActorId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = as_actor {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(actor, None)));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Non-JSON bodies (health check, empty 204) come back as Null.
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn provider_starts_conversation_and_customer_reads_it() {
    let t = setup();

    let (status, conv) = call(
        &t.app,
        "POST",
        "/conversations",
        Some(t.provider),
        Some(json!({ "target_id": t.customer, "initial_message": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(conv["participants"].as_array().unwrap().len(), 2);
    assert_eq!(conv["last_message"]["body"], "Hi");
    assert_eq!(conv["unread_count"], 0);
    let id = conv["id"].as_str().unwrap().to_string();

    let (_, unread) = call(&t.app, "GET", "/unread", Some(t.customer), None).await;
    assert_eq!(unread["total"], 1);

    let (status, _) = call(
        &t.app,
        "POST",
        &format!("/conversations/{id}/read"),
        Some(t.customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, unread) = call(&t.app, "GET", "/unread", Some(t.customer), None).await;
    assert_eq!(unread["total"], 0);

    let (_, messages) = call(
        &t.app,
        "GET",
        &format!("/conversations/{id}/messages"),
        Some(t.customer),
        None,
    )
    .await;
    assert_eq!(messages[0]["read"], true);
    assert_eq!(messages[0]["kind"], "text");
}

#[tokio::test]
async fn repeated_create_returns_same_conversation() {
    let t = setup();
    let body = json!({ "target_id": t.provider });

    let (_, first) = call(&t.app, "POST", "/conversations", Some(t.customer), Some(body.clone())).await;
    let (_, second) = call(&t.app, "POST", "/conversations", Some(t.customer), Some(body)).await;
    assert_eq!(first["id"], second["id"]);

    let (_, list) = call(&t.app, "GET", "/conversations", Some(t.customer), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn customers_cannot_message_customers() {
    let t = setup();

    let (status, gate) = call(
        &t.app,
        "GET",
        &format!("/gate/{}", t.other_customer),
        Some(t.customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gate["allowed"], false);
    assert_eq!(gate["reason"], "Customers can only message service providers.");

    let (status, err) = call(
        &t.app,
        "POST",
        "/conversations",
        Some(t.customer),
        Some(json!({ "target_id": t.other_customer })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "customer_to_customer_blocked");
}

#[tokio::test]
async fn anonymous_requests_are_not_authenticated() {
    let t = setup();

    let (status, gate) = call(&t.app, "GET", &format!("/gate/{}", t.provider), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gate["allowed"], false);

    let (status, err) = call(
        &t.app,
        "POST",
        "/conversations",
        None,
        Some(json!({ "target_id": t.provider })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["error"], "not_authenticated");

    let (status, _) = call(&t.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let t = setup();
    let (_, conv) = call(
        &t.app,
        "POST",
        "/conversations",
        Some(t.provider),
        Some(json!({ "target_id": t.customer })),
    )
    .await;
    let id = conv["id"].as_str().unwrap().to_string();

    let (status, err) = call(
        &t.app,
        "POST",
        &format!("/conversations/{id}/messages"),
        Some(t.provider),
        Some(json!({ "body": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "empty_body");

    let (status, msg) = call(
        &t.app,
        "POST",
        &format!("/conversations/{id}/messages"),
        Some(t.customer),
        Some(json!({ "body": "photo.jpg", "kind": "image" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(msg["kind"], "image");

    let (status, err) = call(
        &t.app,
        "POST",
        &format!("/conversations/{id}/messages"),
        Some(t.other_customer),
        Some(json!({ "body": "let me in" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "not_a_participant");
}

#[tokio::test]
async fn reasons_follow_token_language() {
    let t = setup();
    let request = Request::builder()
        .method("GET")
        .uri(format!("/gate/{}", t.customer))
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token(t.customer, Some("ru"))),
        )
        .header(header::ACCEPT_LANGUAGE, "et")
        .body(Body::empty())
        .unwrap();

    let response = t.app.clone().oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let gate: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(gate["reason"], "Нельзя написать самому себе.");
}

async fn gate_with_lang(t: &TestApp, target: ActorId, lang: &str, accept: &str) -> Value {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/gate/{target}"))
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token(t.customer, Some(lang))),
        )
        .header(header::ACCEPT_LANGUAGE, accept)
        .body(Body::empty())
        .unwrap();

    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn unsupported_lang_claim_keeps_session() {
    let t = setup();

    for lang in ["EN", "de", "en-US", ""] {
        let gate = gate_with_lang(&t, t.provider, lang, "ru").await;
        assert_eq!(gate["allowed"], true, "lang claim {lang:?}");
    }

    // Unknown claim falls back to Accept-Language.
    let gate = gate_with_lang(&t, t.customer, "de", "ru").await;
    assert_eq!(gate["reason"], "Нельзя написать самому себе.");

    // A differently-cased supported tag is still honoured.
    let gate = gate_with_lang(&t, t.customer, "EN", "ru").await;
    assert_eq!(gate["reason"], "You cannot message yourself.");
}

#[tokio::test]
async fn malformed_requests_use_error_body() {
    let t = setup();

    let (status, err) = call(&t.app, "GET", "/gate/not-a-uuid", Some(t.customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "invalid_path");
    assert!(err["reason"].as_str().is_some_and(|r| !r.is_empty()));

    let request = Request::builder()
        .method("POST")
        .uri("/conversations")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token(t.customer, None)),
        )
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"target_id\":"))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let err: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(err["error"], "invalid_body");

    let (status, err) = call(
        &t.app,
        "POST",
        "/conversations/42/messages",
        Some(t.customer),
        Some(json!({ "body": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "invalid_path");
}

#[tokio::test]
async fn role_switch_opens_customer_pair() {
    let t = setup();
    let body = json!({ "target_id": t.other_customer });

    let (status, _) = call(&t.app, "POST", "/conversations", Some(t.customer), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &t.app,
        "PUT",
        "/me/roles",
        Some(t.other_customer),
        Some(json!({ "isClient": true, "isFreelance": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, conv) = call(&t.app, "POST", "/conversations", Some(t.customer), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(conv["participants"].as_array().unwrap().len(), 2);

    let (status, _) = call(
        &t.app,
        "PUT",
        "/me/roles",
        None,
        Some(json!({ "isClient": true })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn per_conversation_unread_badge() {
    let t = setup();
    let (_, conv) = call(
        &t.app,
        "POST",
        "/conversations",
        Some(t.provider),
        Some(json!({ "target_id": t.customer, "initial_message": "Hi" })),
    )
    .await;
    let id = conv["id"].as_str().unwrap().to_string();

    let (_, badge) = call(&t.app, "GET", &format!("/conversations/{id}/unread"), Some(t.customer), None).await;
    assert_eq!(badge["total"], 1);

    let (_, badge) = call(&t.app, "GET", &format!("/conversations/{id}/unread"), Some(t.provider), None).await;
    assert_eq!(badge["total"], 0);

    let (_, badge) = call(
        &t.app,
        "GET",
        &format!("/conversations/{id}/unread"),
        Some(t.other_customer),
        None,
    )
    .await;
    assert_eq!(badge["total"], 0);
}
