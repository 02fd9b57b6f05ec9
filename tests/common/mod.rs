#![allow(dead_code)]

use std::sync::{mpsc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use company_employees_api::app::{app, AppState, Stores};
use company_employees_api::auth::TokenService;
use company_employees_api::config::AppConfig;
use company_employees_api::database::MemoryStore;

pub const IT_SOLUTIONS: &str = "c9d4c053-49b6-410c-bc78-2d54a9991870";
pub const ADMIN_SOLUTIONS: &str = "3d490a70-94ce-4d15-9494-5248280c2ce3";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub token: String,
    client: Client,
}

impl TestServer {
    /// Serves the real router over a seeded memory store on its own runtime thread,
    /// so it outlives the per-test runtimes.
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let token = TokenService::new(&config.security)?.issue("integration-test", &["Manager".to_string()])?;
        let state = AppState::new(Stores::from_backend(MemoryStore::seeded()), &config)?;
        let router = app(state, &config.security);

        let (ready_tx, ready_rx) = mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("failed to bind test port");
                let _ = ready_tx.send(());
                axum::serve(listener, router).await.expect("test server failed");
            });
        });
        ready_rx
            .recv_timeout(Duration::from_secs(10))
            .context("server did not start within 10s")?;

        Ok(Self { port, base_url, token, client: Client::new() })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Client without credentials.
    pub fn anonymous(&self) -> &Client {
        &self.client
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&self.token)
    }

    pub fn head(&self, path: &str) -> RequestBuilder {
        self.client.head(self.url(path)).bearer_auth(&self.token)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&self.token)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&self.token)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path)).bearer_auth(&self.token)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(&self.token)
    }
}

pub fn ensure_server() -> &'static TestServer {
    SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"))
}

/// Creates a company with `count` employees named `Worker 00..` and returns its id.
pub async fn create_company_with_workers(server: &TestServer, name: &str, count: usize) -> Result<String> {
    let employees: Vec<Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "name": format!("Worker {:02}", i),
                "age": 20 + (i % 10) as i32,
                "position": "Clerk"
            })
        })
        .collect();

    let res = server
        .post("/api/companies")
        .json(&serde_json::json!({
            "name": name,
            "address": "1 Test Street",
            "country": "UK",
            "employees": employees
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "create failed: {}", res.status());

    let body: Value = res.json().await?;
    body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .context("created company has no id")
}
