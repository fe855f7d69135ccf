//! Client error types.

use thiserror::Error;

/// Errors raised while building a connection to the Permify API.
///
/// Failures of individual RPCs are reported as `tonic::Status` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Endpoint could not be parsed as a URI.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Both an inline certificate and a certificate file were configured.
    #[error("cert and cert_file are mutually exclusive")]
    ConflictingCertificates,

    /// Inline certificate is not valid base64.
    #[error("cert is not valid base64: {0}")]
    InvalidCertificateEncoding(#[from] base64::DecodeError),

    /// Certificate file could not be read.
    #[error("failed to read certificate file {path}: {source}")]
    CertificateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TLS settings were rejected by the transport.
    #[error("tls configuration rejected: {0}")]
    Tls(#[source] tonic::transport::Error),

    /// Token contains characters that cannot go into a metadata header.
    #[error("token is not a valid header value")]
    InvalidToken,
}

/// Result type for client construction.
pub type Result<T> = std::result::Result<T, ClientError>;
