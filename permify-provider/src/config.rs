//! Provider connection settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use permify_client::{ConnectConfig, DEFAULT_ENDPOINT};

/// How to reach the Permify service. Every option falls back to its
/// environment variable.
#[derive(Args, Debug, Clone)]
pub struct ProviderConfig {
    /// Permify gRPC endpoint (e.g., http://localhost:3478)
    #[arg(long, env = "PERMIFY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Bearer token sent with every request
    #[arg(long, env = "PERMIFY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base64-encoded PEM CA certificate; enables TLS
    #[arg(long, env = "PERMIFY_CERT", hide_env_values = true, conflicts_with = "cert_file")]
    pub cert: Option<String>,

    /// Path to a PEM CA certificate; enables TLS
    #[arg(long, env = "PERMIFY_CERT_FILE")]
    pub cert_file: Option<PathBuf>,

    /// Connect timeout in seconds
    #[arg(long, default_value = "10")]
    pub connect_timeout: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            cert: None,
            cert_file: None,
            connect_timeout: 10,
        }
    }
}

impl From<&ProviderConfig> for ConnectConfig {
    fn from(config: &ProviderConfig) -> Self {
        let mut connect = ConnectConfig::new(config.endpoint.clone());
        connect.token = config.token.clone();
        connect.cert = config.cert.clone();
        connect.cert_file = config.cert_file.clone();
        connect.connect_timeout =
            (config.connect_timeout > 0).then(|| Duration::from_secs(config.connect_timeout));
        connect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ProviderConfig,
    }

    #[test]
    fn test_flags_map_to_connect_config() {
        let cli = TestCli::parse_from([
            "test",
            "--endpoint",
            "https://permify.internal:3478",
            "--token",
            "secret",
            "--cert-file",
            "/etc/permify/ca.pem",
            "--connect-timeout",
            "3",
        ]);
        let connect = ConnectConfig::from(&cli.config);
        assert_eq!(connect.endpoint, "https://permify.internal:3478");
        assert_eq!(connect.token.as_deref(), Some("secret"));
        assert_eq!(connect.cert_file, Some(PathBuf::from("/etc/permify/ca.pem")));
        assert_eq!(connect.connect_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = ProviderConfig {
            connect_timeout: 0,
            ..Default::default()
        };
        assert_eq!(ConnectConfig::from(&config).connect_timeout, None);
    }

    #[test]
    fn test_cert_and_cert_file_conflict() {
        let result = TestCli::try_parse_from([
            "test",
            "--cert",
            "Zm9v",
            "--cert-file",
            "/tmp/ca.pem",
        ]);
        assert!(result.is_err());
    }
}
