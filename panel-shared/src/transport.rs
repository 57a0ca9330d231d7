//! Platform HTTP transport.
//!
//! `gloo-net` (browser fetch) on wasm32, `reqwest` everywhere else. Both
//! sides hand back the status code and the body text; status handling and
//! decoding live in the client.

use std::time::Duration;

use crate::motor_client::MotorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

/// Encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Body {
    Empty,
    Json(String),
    Form(String),
}

impl Body {
    fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Empty => None,
            Body::Json(_) => Some("application/json"),
            Body::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Body::Empty => None,
            Body::Json(text) | Body::Form(text) => Some(text),
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    #[cfg(not(target_arch = "wasm32"))]
    http: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl Transport {
    pub fn new(request_timeout: Duration) -> Self {
        let http = match reqwest::Client::builder().timeout(request_timeout).build() {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!("HTTP client setup failed, requests will not time out: {err}");
                reqwest::Client::new()
            }
        };
        Self { http }
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Body,
    ) -> Result<RawResponse, MotorError> {
        let mut request = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if let Some(content_type) = body.content_type() {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(text) = body.into_text() {
            request = request.body(text);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(target_arch = "wasm32")]
impl Transport {
    /// Browser fetch has no per-request timeout; the argument is ignored.
    pub fn new(_request_timeout: Duration) -> Self {
        Self {}
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Body,
    ) -> Result<RawResponse, MotorError> {
        use gloo_net::http::Request;

        let mut builder = match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
        };
        if let Some(content_type) = body.content_type() {
            builder = builder.header("Content-Type", content_type);
        }
        let request = match body.into_text() {
            Some(text) => builder.body(text)?,
            None => builder.build()?,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
