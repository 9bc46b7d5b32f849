//! Integration tests for the Hostgate server.
//!
//! These tests spawn the real binary with a temporary users file and drive
//! it over HTTP, verifying the pass-through/challenge contract end to end.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand::rngs::OsRng;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;

/// The realm every test server is started with.
pub const REALM: &str = "Tatooine";

/// The expected `WWW-Authenticate` value for [`REALM`].
pub const CHALLENGE: &str = "Basic realm=\"Tatooine\"";

#[derive(Debug, Deserialize)]
pub struct WhoamiResponse {
    pub username: String,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A test server instance that manages its own users file and process.
pub struct TestServer {
    process: Child,
    pub base_url: String,
    _data_dir: TempDir,
}

impl TestServer {
    /// Start a new test server on the specified port.
    ///
    /// The users file carries `luke_skywalker:pass123` and the
    /// empty-password account `kiosk`, both under the `login` service.
    pub async fn start(port: u16) -> Result<Self> {
        let data_dir = TempDir::new().context("Failed to create temp dir")?;

        let users_path = data_dir.path().join("users.json");
        let users = json!({
            "login": {
                "luke_skywalker": {
                    "password_hash": hash_password("pass123"),
                    "uid": 1000,
                    "gid": 1000,
                    "groups": ["rebels", "pilots"],
                },
                "kiosk": {
                    "password_hash": hash_password(""),
                },
            }
        });
        let mut file =
            std::fs::File::create(&users_path).context("Failed to create users file")?;
        write!(file, "{users}").context("Failed to write users file")?;

        let server_binary = find_server_binary()?;

        let process = Command::new(&server_binary)
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .arg("--realm")
            .arg(REALM)
            .arg("--service")
            .arg("login")
            .arg("--users")
            .arg(&users_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start server: {:?}", server_binary))?;

        let base_url = format!("http://127.0.0.1:{}", port);

        let server = Self {
            process,
            base_url,
            _data_dir: data_dir,
        };

        server.wait_for_ready().await?;

        Ok(server)
    }

    /// Wait for the server to be ready to accept connections.
    ///
    /// Any HTTP response counts, including the challenge: the routes are
    /// behind the gate, so an unauthenticated probe legitimately gets 401.
    async fn wait_for_ready(&self) -> Result<()> {
        let client = Client::new();
        let url = format!("{}/", self.base_url);

        for _ in 0..50 {
            match client.get(&url).send().await {
                Ok(_) => return Ok(()),
                Err(_) => tokio::time::sleep(Duration::from_millis(100)).await,
            }
        }

        bail!("Server failed to start within 5 seconds")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("failed to hash password")
        .to_string()
}

/// Find the server binary in the target directory.
fn find_server_binary() -> Result<std::path::PathBuf> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    // Try debug build first, then release
    let candidates = [
        std::path::Path::new(&manifest_dir).join("../../target/debug/hostgate-server"),
        std::path::Path::new(&manifest_dir).join("../../target/debug/hostgate-server.exe"),
        std::path::Path::new(&manifest_dir).join("../../target/release/hostgate-server"),
        std::path::Path::new(&manifest_dir).join("../../target/release/hostgate-server.exe"),
    ];

    for candidate in &candidates {
        if candidate.exists() {
            return Ok(candidate.canonicalize()?);
        }
    }

    bail!(
        "Could not find hostgate-server binary. Run 'cargo build -p hostgate-server' first. Searched in: {:?}",
        candidates
    )
}

/// Asserts the uniform rejection: 401 plus the realm challenge.
pub fn assert_challenged(response: &Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .expect("401 without WWW-Authenticate challenge");
    assert_eq!(challenge, CHALLENGE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU16, Ordering};

    // Port counter to avoid conflicts between parallel tests
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18300);

    fn next_port() -> u16 {
        PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_valid_credentials_pass_through() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client
            .get(server.url("/"))
            .basic_auth("luke_skywalker", Some("pass123"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_whoami_reports_identity_attributes() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client
            .get(server.url("/whoami"))
            .basic_auth("luke_skywalker", Some("pass123"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let whoami: WhoamiResponse = response.json().await.unwrap();
        assert_eq!(whoami.username, "luke_skywalker");
        assert_eq!(whoami.uid, Some(1000));
        assert_eq!(whoami.gid, Some(1000));
        assert_eq!(whoami.groups, vec!["rebels", "pilots"]);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client
            .get(server.url("/"))
            .basic_auth("luke_skywalker", Some("wrong"))
            .send()
            .await
            .unwrap();

        assert_challenged(&response);
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client
            .get(server.url("/"))
            .basic_auth("darth_vader", Some("secret456"))
            .send()
            .await
            .unwrap();

        assert_challenged(&response);
    }

    #[tokio::test]
    async fn test_missing_header_challenged() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client.get(server.url("/")).send().await.unwrap();

        assert_challenged(&response);
    }

    #[tokio::test]
    async fn test_malformed_headers_challenged() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        for value in [
            "Complex bHVrZQ==",   // unsupported scheme
            "Basic Hello-World!", // invalid base64
            "Basic bm9Db2xvbg==", // "noColon", no separator
            "Basic",              // scheme without payload
        ] {
            let response = client
                .get(server.url("/"))
                .header(header::AUTHORIZATION, value)
                .send()
                .await
                .unwrap();

            assert_challenged(&response);
        }
    }

    #[tokio::test]
    async fn test_empty_password_account_accepted() {
        let server = TestServer::start(next_port()).await.unwrap();
        let client = Client::new();

        let response = client
            .get(server.url("/whoami"))
            .basic_auth("kiosk", Some(""))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let whoami: WhoamiResponse = response.json().await.unwrap();
        assert_eq!(whoami.username, "kiosk");
        assert_eq!(whoami.uid, None);
    }
}
