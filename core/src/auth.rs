//! Request authentication.
//!
//! Token acquisition (IAM API key exchange) happens outside this crate; an
//! authenticator only turns credentials it already holds into a header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Clone, PartialEq, Eq)]
pub enum Authenticator {
    NoAuth,
    BearerToken(String),
    Basic { username: String, password: String },
}

impl Authenticator {
    /// The `Authorization` header value, if this authenticator sends one.
    pub fn authorization(&self) -> Option<String> {
        match self {
            Authenticator::NoAuth => None,
            Authenticator::BearerToken(token) => Some(format!("Bearer {token}")),
            Authenticator::Basic { username, password } => {
                Some(format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
            }
        }
    }

    pub fn auth_type(&self) -> &'static str {
        match self {
            Authenticator::NoAuth => "noauth",
            Authenticator::BearerToken(_) => "bearertoken",
            Authenticator::Basic { .. } => "basic",
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Authenticator({})", self.auth_type())
    }
}
