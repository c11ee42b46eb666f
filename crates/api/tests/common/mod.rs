//! Shared integration-test harness: the real router with an in-memory
//! database pool, a scripted fake AI, and a recording fake checkout
//! provider.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fableloom_ai::{AiError, StoryAi};
use fableloom_api::auth::jwt::{generate_access_token, JwtConfig};
use fableloom_api::auth::password::hash_password;
use fableloom_api::config::ServerConfig;
use fableloom_api::mailer::Mailer;
use fableloom_api::router::build_app_router;
use fableloom_api::state::AppState;
use fableloom_core::roles::ROLE_USER;
use fableloom_db::models::user::{CreateUser, User};
use fableloom_db::repositories::UserRepo;
use fableloom_payments::{CheckoutProvider, CheckoutRequest, CheckoutSession, PaymentError};

/// Webhook secret shared by the test config and signed test payloads.
pub const WEBHOOK_SECRET: &str = "whsec_integration_test";

/// Password every seeded user gets.
pub const PASSWORD: &str = "password123!";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "----fableloom-test-boundary";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Scripted [`StoryAi`]: answers containing `"off-topic"` are classified
/// not-relevant; `fail: true` makes every call error.
pub struct FakeStoryAi {
    pub fail: bool,
}

impl FakeStoryAi {
    pub fn working() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn outage(&self) -> AiError {
        AiError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl StoryAi for FakeStoryAi {
    async fn check_relevance(&self, _question: &str, answer: &str) -> Result<bool, AiError> {
        if self.fail {
            return Err(self.outage());
        }
        Ok(!answer.contains("off-topic"))
    }

    async fn generate_sub_question(
        &self,
        question: &str,
        _answer: &str,
    ) -> Result<String, AiError> {
        if self.fail {
            return Err(self.outage());
        }
        Ok(format!("Could you tell me more about \"{question}\"?"))
    }

    async fn generate_story(
        &self,
        _questions: &[String],
        answers: &[String],
    ) -> Result<String, AiError> {
        if self.fail {
            return Err(self.outage());
        }
        Ok(format!("A story woven from {} answers.", answers.len()))
    }
}

/// Recording [`CheckoutProvider`]: every request is captured and a fixed
/// session is returned.
#[derive(Default)]
pub struct FakeCheckout {
    pub requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakeCheckout {
    /// Metadata of the most recent captured request.
    pub fn last_metadata(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.metadata.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CheckoutProvider for FakeCheckout {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: "https://checkout.test/session/cs_test_1".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Server configuration for tests; no environment variables involved.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 5,
        base_url: "http://localhost:4000".to_string(),
        client_url: "http://localhost:3000".to_string(),
        upload_dir: std::env::temp_dir()
            .join("fableloom-test-uploads")
            .to_string_lossy()
            .into_owned(),
        ai_base_url: "http://ai.invalid".to_string(),
        stripe_secret_key: "sk_test_key".to_string(),
        stripe_webhook_secret: WEBHOOK_SECRET.to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_hours: 24,
            refresh_token_expiry_hours: 72,
        },
    }
}

/// Build the app with a working fake AI and a fresh fake checkout.
pub fn build_app(pool: PgPool) -> (Router, Arc<FakeCheckout>) {
    build_app_with_ai(pool, Arc::new(FakeStoryAi::working()))
}

/// Build the app with a specific [`StoryAi`] fake.
pub fn build_app_with_ai(pool: PgPool, story_ai: Arc<dyn StoryAi>) -> (Router, Arc<FakeCheckout>) {
    let config = test_config();
    let checkout = Arc::new(FakeCheckout::default());
    let state = AppState {
        pool,
        story_ai,
        checkout: checkout.clone(),
        mailer: Arc::new(Mailer::disabled()),
        config: Arc::new(config.clone()),
    };
    (build_app_router(state, &config), checkout)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user with [`PASSWORD`] and mint an access token for them.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let password_hash = hash_password(PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash,
            mobile: "N/A".to_string(),
            location: None,
            gender: "Not specified".to_string(),
            date_of_birth: None,
            profile_picture: String::new(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user insert should succeed");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Insert a regular user.
pub async fn seed_regular_user(pool: &PgPool, email: &str) -> (User, String) {
    seed_user(pool, email, ROLE_USER).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a JSON (or empty-body) request and return status + parsed body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Send a multipart request built by [`multipart_body`].
pub async fn send_multipart(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Vec<u8>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri).header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Assemble a multipart body from text fields plus an optional file part.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((field_name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
