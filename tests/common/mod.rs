use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use devconnect_api::auth::{generate_token, Claims};
use devconnect_api::models::User;
use devconnect_api::store;
use devconnect_api::store::manager::StoreManager;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let target_dir = std::env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "target".into());
        let mut cmd = Command::new(format!("{}/debug/devconnect-api", target_dir));
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready on ok or degraded; degraded just means no store yet
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Store-backed suites need a database; skip quietly when none is configured.
#[allow(dead_code)]
pub fn store_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Insert a user document directly into the store and return its id.
#[allow(dead_code)]
pub async fn seed_user(name: &str) -> Result<Uuid> {
    StoreManager::ensure_collections().await?;

    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        avatar: Some("https://gravatar.example/avatar.png".to_string()),
        password: Some("$2a$10$not.a.real.hash".to_string()),
        created_at: chrono::Utc::now(),
    };
    store::users().await?.insert(user.id, &user).await?;
    Ok(user.id)
}

/// Mint a bearer token for the given user, matching the server's secret.
#[allow(dead_code)]
pub fn token_for(user_id: Uuid) -> String {
    generate_token(Claims::new(user_id)).expect("token generation")
}
