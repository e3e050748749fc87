//! Shared helpers for the HTTP integration tests.
//!
//! Every test gets its own router over fresh in-memory stores, so tests run
//! in parallel without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use agencydesk_api::{AppState, build_app};
use agencydesk_auth::{Claims, PasswordHasher, TokenKind};
use agencydesk_core::config::{
    AppConfig, AuthConfig, BootstrapConfig, DatabaseConfig, Environment, LoggingConfig,
    ServerConfig,
};
use agencydesk_database::store::UserStore;
use agencydesk_database::{MemoryClientStore, MemoryUserStore};
use agencydesk_entity::user::{NewUser, Role, User};

pub const PASSWORD: &str = "Secret123!";
pub const STRONG_PASSWORD: &str = "Vivid-Lantern-Orbit-73";

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub clients: Arc<MemoryClientStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// All `Set-Cookie` header values.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The `Set-Cookie` value for `name`, if one was sent.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// Value part of the `Set-Cookie` for `name`.
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.set_cookie(name).map(|c| {
            let pair = c.split(';').next().unwrap_or_default();
            pair[name.len() + 1..].to_string()
        })
    }
}

/// Credentials attached to a request.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    /// Raw `Cookie` header value.
    Cookies(&'a str),
    BearerAndCookies(&'a str, &'a str),
}

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Test,
        server: ServerConfig::default(),
        database: DatabaseConfig {
            in_memory: true,
            ..DatabaseConfig::default()
        },
        auth: AuthConfig {
            jwt_secret: "integration-access-secret-0123456789abcdef".into(),
            jwt_refresh_secret: "integration-refresh-secret-0123456789abcdef".into(),
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
        bootstrap: BootstrapConfig::default(),
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let clients = Arc::new(MemoryClientStore::new());
        let state = AppState::new(config, users.clone(), clients.clone(), None)
            .expect("Failed to build app state");

        Self {
            router: build_app(state.clone()),
            state,
            users,
            clients,
        }
    }

    /// Inserts an active account with [`PASSWORD`].
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let hasher = PasswordHasher::new(&self.state.config.auth).expect("hasher");
        self.users
            .create(&NewUser {
                email: email.into(),
                name: "Test Staff".into(),
                password_hash: hasher.hash_password(PASSWORD).expect("hash"),
                role,
            })
            .await
            .expect("Failed to seed user")
    }

    /// Logs in through the API and returns the response.
    pub async fn login_response(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": email, "password": password })),
            Auth::None,
        )
        .await
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, email: &str) -> String {
        let response = self.login_response(email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "Login failed: {:?}", response.body);
        response.data()["accessToken"]
            .as_str()
            .expect("No accessToken in login response")
            .to_string()
    }

    /// Seeds a user and returns a bearer token for them.
    pub async fn staff(&self, email: &str, role: Role) -> (User, String) {
        let user = self.seed_user(email, role).await;
        let token = self.login(email).await;
        (user, token)
    }

    /// A correctly signed access token that expired an hour ago.
    pub fn expired_access_token(&self, user: &User) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims::for_principal(&user.principal(), now - 7200, 3600);
        self.state
            .authority
            .encoder()
            .sign(&claims, TokenKind::Access)
            .expect("sign")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Auth<'_>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        match auth {
            Auth::None => {}
            Auth::Bearer(token) => {
                req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            Auth::Cookies(cookies) => {
                req = req.header(header::COOKIE, cookies);
            }
            Auth::BearerAndCookies(token, cookies) => {
                req = req
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::COOKIE, cookies);
            }
        }

        let body = match body {
            Some(b) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(req.body(body).expect("Failed to build request"))
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
