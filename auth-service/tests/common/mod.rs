#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::TokenConfig;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::memory::InMemoryRevocationStore;
use auth_service::outbound::memory::InMemoryUserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

pub type TestAuthService = AuthService<InMemoryUserRepository, InMemoryRevocationStore>;

pub fn token_config(validity: chrono::Duration) -> TokenConfig {
    TokenConfig::new(TEST_SECRET.to_vec(), validity).expect("Invalid token config")
}

/// Auth service wired to in-memory stores, with handles on both stores.
pub struct TestService {
    pub service: Arc<TestAuthService>,
    pub users: Arc<InMemoryUserRepository>,
    pub revocation_store: Arc<InMemoryRevocationStore>,
    pub authenticator: Arc<Authenticator>,
}

impl TestService {
    pub fn new() -> Self {
        Self::with_validity(chrono::Duration::hours(1))
    }

    pub fn with_validity(validity: chrono::Duration) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let revocation_store = Arc::new(InMemoryRevocationStore::new());
        let authenticator = Arc::new(Authenticator::new(token_config(validity)));

        let service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&revocation_store),
            Arc::clone(&authenticator),
        ));

        Self {
            service,
            users,
            revocation_store,
            authenticator,
        }
    }
}

/// Test application that spawns a real server backed by in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub revocation_store: Arc<InMemoryRevocationStore>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let test_service = TestService::new();
        let router = create_router(test_service.service.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            revocation_store: test_service.revocation_store,
            authenticator: test_service.authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the issued token.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
