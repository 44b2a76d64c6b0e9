//! Doubles shared by unit tests across the crate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::api::auth::ProfileRow;
use crate::auth::{AuthError, AuthProvider, AuthSession};
use crate::generator::backend::{GenerationError, GenerationSettings, ModelBackend};

/// [`ModelBackend`] that replays canned replies and records every prompt.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback_error: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            fallback_error: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a 500 carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback_error: Some(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn submit(
        &self,
        prompt: &str,
        _settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());

        let next = self.replies.lock().expect("replies lock").pop_front();
        match (next, self.fallback_error.clone()) {
            (Some(Ok(text)), _) => Ok(text),
            (Some(Err(message)), _) | (None, Some(message)) => Err(GenerationError::Api {
                status: 500,
                message,
            }),
            (None, None) => Err(GenerationError::EmptyReply),
        }
    }
}

pub fn test_session(user_id: &str, email: &str, expires_at: DateTime<Utc>) -> AuthSession {
    AuthSession {
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at,
        user_id: user_id.to_string(),
        email: Some(email.to_string()),
    }
}

pub fn test_profile_row(user_id: &str, username: Option<&str>) -> ProfileRow {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    ProfileRow {
        id: user_id.to_string(),
        username: username.map(str::to_string),
        age: Some(27),
        gender: Some("female".to_string()),
        interests: Some(vec!["music".to_string()]),
        bio: Some("Loves sunsets".to_string()),
        created_at: created,
        updated_at: created,
    }
}

fn rejected(message: &str) -> AuthError {
    AuthError::Rejected {
        status: 400,
        message: message.to_string(),
    }
}

/// In-memory identity provider. Accepts a single account and records the
/// name of every call it receives.
pub struct MockAuthProvider {
    email: String,
    password: String,
    user_id: String,
    profile: Option<ProfileRow>,
    confirm_sign_ups: bool,
    refresh_works: bool,
    calls: Mutex<Vec<String>>,
}

impl MockAuthProvider {
    pub fn new(email: &str, password: &str) -> Self {
        let user_id = "user-1".to_string();
        Self {
            email: email.to_string(),
            password: password.to_string(),
            profile: Some(test_profile_row(&user_id, Some("sam"))),
            user_id,
            confirm_sign_ups: false,
            refresh_works: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile(mut self, profile: Option<ProfileRow>) -> Self {
        self.profile = profile;
        self
    }

    /// Sign-ups succeed without a session, as with e-mail confirmation on.
    pub fn requiring_confirmation(mut self) -> Self {
        self.confirm_sign_ups = true;
        self
    }

    pub fn with_broken_refresh(mut self) -> Self {
        self.refresh_works = false;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().expect("calls lock").push(call.to_string());
    }

    fn fresh_session(&self, email: &str) -> AuthSession {
        test_session(&self.user_id, email, Utc::now() + Duration::hours(1))
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.record("sign_in");
        if email != self.email || password != self.password {
            return Err(rejected("Invalid login credentials"));
        }
        Ok(self.fresh_session(email))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _username: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        self.record("sign_up");
        if email == self.email {
            return Err(rejected("User already registered"));
        }
        if self.confirm_sign_ups {
            return Ok(None);
        }
        Ok(Some(self.fresh_session(email)))
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), AuthError> {
        self.record("sign_out");
        Ok(())
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<AuthSession, AuthError> {
        self.record("refresh_session");
        if !self.refresh_works {
            return Err(rejected("Invalid Refresh Token"));
        }
        let email = self.email.clone();
        Ok(self.fresh_session(&email))
    }

    async fn fetch_profile(&self, _session: &AuthSession) -> Result<Option<ProfileRow>, AuthError> {
        self.record("fetch_profile");
        Ok(self.profile.clone())
    }
}

/// Canned HTTP response served by [`spawn_http_stub`].
pub struct StubResponse {
    status: u16,
    body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

pub struct HttpStub {
    base_url: String,
    captured: Arc<tokio::sync::Mutex<Vec<CapturedRequest>>>,
    server: tokio::task::JoinHandle<()>,
}

impl HttpStub {
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    /// Waits for the server to answer every scripted response.
    pub async fn requests(self) -> Vec<CapturedRequest> {
        self.server.await.expect("stub server should finish");
        let captured = self.captured.lock().await;
        captured.clone()
    }
}

/// Serve `responses` in order, one connection each, on a local port.
pub async fn spawn_http_stub(responses: Vec<StubResponse>) -> HttpStub {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    let server = tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let request = read_http_request(&mut stream).await.expect("request");
            captured_for_server.lock().await.push(request);

            let reply = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            stream.write_all(reply.as_bytes()).await.expect("write");
            stream.shutdown().await.ok();
        }
    });

    HttpStub {
        base_url: format!("http://{addr}"),
        captured,
        server,
    }
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text = std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
