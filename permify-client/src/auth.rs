//! Bearer token injection for outgoing calls.

use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::error::{ClientError, Result};

const AUTHORIZATION: &str = "authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// Attaches `authorization: Bearer <token>` to every request when a token is set.
///
/// Without a token the interceptor passes requests through untouched.
#[derive(Debug, Clone, Default)]
pub struct AuthInterceptor {
    header: Option<MetadataValue<Ascii>>,
}

impl AuthInterceptor {
    /// Build an interceptor. Empty tokens count as absent.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let header = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                let has_prefix = token
                    .get(..BEARER_PREFIX.len())
                    .is_some_and(|p| p.eq_ignore_ascii_case(BEARER_PREFIX));
                let value = if has_prefix {
                    format!("{BEARER_PREFIX}{}", &token[BEARER_PREFIX.len()..])
                } else {
                    format!("{BEARER_PREFIX}{token}")
                };
                Some(
                    value
                        .parse::<MetadataValue<Ascii>>()
                        .map_err(|_| ClientError::InvalidToken)?,
                )
            }
            None => None,
        };
        Ok(Self { header })
    }

    /// Whether requests will carry an authorization header.
    pub fn is_enabled(&self) -> bool {
        self.header.is_some()
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        if let Some(value) = &self.header {
            request
                .metadata_mut()
                .insert(AUTHORIZATION, value.clone());
        }
        Ok(request)
    }
}
