//! permify-client: gRPC access to the Permify tenancy, schema and bundle services.
//!
//! # Example
//! ```ignore
//! use permify_client::{ConnectConfig, PermifyApi, PermifyClient};
//!
//! let mut config = ConnectConfig::new("http://localhost:3478");
//! config.token = Some("secret".into());
//! let client = PermifyClient::connect_lazy(&config)?;
//! let page = client.list_tenants(100, String::new()).await?;
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod proto;
pub mod rpc;

pub use api::PermifyApi;
pub use auth::AuthInterceptor;
pub use client::{AuthChannel, ConnectConfig, PermifyClient, DEFAULT_ENDPOINT};
pub use error::ClientError;
