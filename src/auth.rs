//! Request-signing strategies for the Moip REST API.
//!
//! Credentials are turned into an `Authorization` header value when the
//! strategy is built, so a token that cannot travel in a header is reported
//! to the caller instead of producing an unsigned request.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::connect::ConnectError;
use crate::hooks::{Authentication, Hooks};

/// HTTP Basic authentication with an API token and key
#[derive(Clone)]
pub struct BasicAuth {
    header: HeaderValue,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("token", &"<redacted>")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl BasicAuth {
    pub fn new(token: &str, key: &str) -> Result<Self, ConnectError> {
        let encoded = STANDARD.encode(format!("{}:{}", token, key));
        Ok(Self {
            header: sensitive_header(&format!("Basic {}", encoded))?,
        })
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl Authentication for BasicAuth {
    fn register(&self, hooks: &mut Hooks) {
        set_authorization(hooks, self.header.clone());
    }
}

/// OAuth access token obtained through the Connect flow
#[derive(Clone)]
pub struct OAuth {
    header: HeaderValue,
}

impl std::fmt::Debug for OAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl OAuth {
    pub fn new(access_token: &str) -> Result<Self, ConnectError> {
        Ok(Self {
            header: sensitive_header(&format!("OAuth {}", access_token))?,
        })
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl Authentication for OAuth {
    fn register(&self, hooks: &mut Hooks) {
        set_authorization(hooks, self.header.clone());
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, ConnectError> {
    let mut header = HeaderValue::from_str(value)?;
    header.set_sensitive(true);
    Ok(header)
}

fn set_authorization(hooks: &mut Hooks, header: HeaderValue) {
    hooks.before_request(move |request| {
        request.headers_mut().insert(AUTHORIZATION, header.clone());
    });
}
