//! HTTP credential service.
//!
//! Posts JSON to `<base_url>/auth/sign-in` and `<base_url>/auth/sign-out`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::{debug, warn};

use super::{AuthError, CredentialService, SignInResponse};

/// Default HTTP request timeout in seconds.
/// A hung backend must not freeze the sign-in screen forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SIGN_IN_PATH: &str = "/auth/sign-in";
const SIGN_OUT_PATH: &str = "/auth/sign-out";

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Credential service backed by a JSON HTTP API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpCredentialService {
    client: Client,
    base_url: String,
}

impl HttpCredentialService {
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl CredentialService for HttpCredentialService {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError> {
        let url = self.url(SIGN_IN_PATH);
        debug!(%url, email, "Sending sign-in request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&SignInRequest { email, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("Malformed sign-in body: {}", e)))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let url = self.url(SIGN_OUT_PATH);
        let response = self.client.post(&url).send().await?;
        if let Err(e) = Self::check_response(response).await {
            warn!(error = %e, "Sign-out rejected by server");
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP request with a canned response and hand back
    /// the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(head_end) = find_head_end(&request) {
                    let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    fn find_head_end(bytes: &[u8]) -> Option<usize> {
        bytes.windows(4).position(|w| w == b"\r\n\r\n")
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service = HttpCredentialService::new("http://localhost:8080/").unwrap();
        assert_eq!(service.base_url(), "http://localhost:8080");
        assert_eq!(service.url(SIGN_IN_PATH), "http://localhost:8080/auth/sign-in");
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"user":{"id":"7","email":"a@b.com"},"token":"t0k"}"#,
        )
        .await;
        let service = HttpCredentialService::new(&base).unwrap();

        let resp = service.sign_in("a@b.com", "pw").await.unwrap();
        assert_eq!(resp.user, User::new("7", "a@b.com"));
        assert_eq!(resp.token, "t0k");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/sign-in"));
        assert!(request.contains(r#""email":"a@b.com""#));
        assert!(request.contains(r#""password":"pw""#));
    }

    #[tokio::test]
    async fn test_sign_in_unauthorized() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"error":"bad"}"#).await;
        let service = HttpCredentialService::new(&base).unwrap();

        let err = service.sign_in("a@b.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_in_malformed_body() {
        let (base, server) = serve_once("200 OK", r#"{"user":null}"#).await;
        let service = HttpCredentialService::new(&base).unwrap();

        let err = service.sign_in("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_out_server_error() {
        let (base, server) = serve_once("503 Service Unavailable", "down").await;
        let service = HttpCredentialService::new(&base).unwrap();

        let err = service.sign_out().await.unwrap_err();
        assert!(matches!(err, AuthError::Server(_)));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/sign-out"));
    }
}
