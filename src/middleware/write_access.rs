use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
};

/// Checks presented credentials against the configured write password.
///
/// Write operations never consult ambient state: they require a `WriteCapability`,
/// which only this guard can hand out.
#[derive(Clone)]
pub struct WriteGuard {
    password: Option<Arc<str>>,
}

/// Proof that the current caller passed the write check
#[derive(Debug)]
pub struct WriteCapability {
    _verified: (),
}

impl WriteGuard {
    /// A blank or missing password disables writes entirely
    pub fn new(password: Option<String>) -> Self {
        let password = password
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(Arc::from);
        Self { password }
    }

    pub fn writes_enabled(&self) -> bool {
        self.password.is_some()
    }

    pub fn verify(&self, presented: &str) -> AppResult<WriteCapability> {
        match &self.password {
            Some(expected) if constant_time_eq(expected.as_bytes(), presented.as_bytes()) => {
                Ok(WriteCapability { _verified: () })
            }
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Verifies an `Authorization: Bearer <password>` header
    pub fn verify_headers(&self, headers: &HeaderMap) -> AppResult<WriteCapability> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        self.verify(presented.trim())
    }
}

impl std::fmt::Debug for WriteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteGuard")
            .field("writes_enabled", &self.writes_enabled())
            .finish()
    }
}

/// Byte comparison whose running time depends only on the longer input.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = a.len() ^ b.len();
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

#[axum::async_trait]
impl FromRequestParts<AppState> for WriteCapability {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let capability = state.write_guard.verify_headers(&parts.headers);

        if capability.is_err() {
            let request_id = parts.extensions.get::<RequestId>().copied();
            tracing::warn!(
                request_id = ?request_id.map(|id| id.to_string()),
                writes_enabled = state.write_guard.writes_enabled(),
                "Rejected write request"
            );
        }

        capability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_correct_password_grants_capability() {
        let guard = WriteGuard::new(Some("popcorn".to_string()));
        assert!(guard.verify("popcorn").is_ok());
        assert!(guard.verify_headers(&bearer("Bearer popcorn")).is_ok());
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let guard = WriteGuard::new(Some("popcorn".to_string()));
        assert!(matches!(guard.verify("popcor"), Err(AppError::Unauthorized)));
        assert!(matches!(guard.verify("popcorn!"), Err(AppError::Unauthorized)));
        assert!(guard.verify_headers(&bearer("popcorn")).is_err());
        assert!(guard.verify_headers(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_unset_password_disables_writes() {
        let guard = WriteGuard::new(None);
        assert!(!guard.writes_enabled());
        assert!(guard.verify("").is_err());

        let blank = WriteGuard::new(Some("   ".to_string()));
        assert!(!blank.writes_enabled());
        assert!(blank.verify_headers(&bearer("Bearer ")).is_err());
    }

    #[test]
    fn test_comparison_covers_every_byte_of_both_inputs() {
        assert!(constant_time_eq(b"popcorn", b"popcorn"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"popcorn", b"popcorn\0"));
        assert!(!constant_time_eq(b"popcorn\0", b"popcorn"));
        assert!(!constant_time_eq(b"", b"\0"));
        assert!(!constant_time_eq(b"popcorn", b"popcorm"));
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let guard = WriteGuard::new(Some("popcorn".to_string()));
        assert!(!format!("{:?}", guard).contains("popcorn"));
    }
}
