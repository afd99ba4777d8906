//! Every service client holds an `Arc<dyn AuthenticationService>`. It decorates
//! outgoing requests (tokens, signatures) and resolves the base address of a
//! service from the catalog. Identity protocols live outside this crate; plug
//! one in by implementing the trait.
//!
//! # Example
//! ```no_run
//! use openstack_sdk::auth::StaticAuthentication;
//! use openstack_sdk::compute;
//! use std::sync::Arc;
//!
//! let file_str = std::fs::read_to_string("tests/compute/config.toml").unwrap();
//! let auth: StaticAuthentication = toml::from_str(&file_str).unwrap();
//! let client = compute::Client::builder()
//!     .auth(Arc::new(auth))
//!     .region("RegionOne")
//!     .build();
//! ```

use reqwest::RequestBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("failed to authenticate request: {0}")]
    Provider(String),
    #[error("no endpoint for service type `{0}`")]
    EndpointNotFound(String),
    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),
}

#[async_trait::async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Adds whatever the identity service requires to `request`.
    async fn authenticate_request(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, AuthError>;

    /// Resolves the base URI of a service from the catalog.
    async fn base_address(
        &self,
        service_type: &str,
        service_name: Option<&str>,
        region: Option<&str>,
        internal_address: bool,
    ) -> Result<Url, AuthError>;
}

/// A pre-issued token and a fixed endpoint table.
///
/// Handy for tests and for deployments where a token is obtained out of band.
/// Deserializes from configuration such as:
///
/// ```toml
/// token = "gAAAAAB..."
///
/// [endpoints]
/// compute = "https://nova.example.com/v2.1/tenant"
/// object-store = "https://swift.example.com/v1/AUTH_tenant"
///
/// [internal_endpoints]
/// object-store = "http://10.0.0.5:8080/v1/AUTH_tenant"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticAuthentication {
    pub token: Option<String>,
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    #[serde(default)]
    pub internal_endpoints: HashMap<String, String>,
}

impl StaticAuthentication {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, service_type: &str, endpoint: impl Into<String>) -> Self {
        self.endpoints
            .insert(service_type.to_owned(), endpoint.into());
        self
    }

    pub fn with_internal_endpoint(
        mut self,
        service_type: &str,
        endpoint: impl Into<String>,
    ) -> Self {
        self.internal_endpoints
            .insert(service_type.to_owned(), endpoint.into());
        self
    }
}

#[async_trait::async_trait]
impl AuthenticationService for StaticAuthentication {
    async fn authenticate_request(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, AuthError> {
        Ok(match &self.token {
            Some(token) => request.header("X-Auth-Token", token),
            None => request,
        })
    }

    async fn base_address(
        &self,
        service_type: &str,
        _service_name: Option<&str>,
        _region: Option<&str>,
        internal_address: bool,
    ) -> Result<Url, AuthError> {
        let endpoint = internal_address
            .then(|| self.internal_endpoints.get(service_type))
            .flatten()
            .or_else(|| self.endpoints.get(service_type))
            .ok_or_else(|| AuthError::EndpointNotFound(service_type.to_owned()))?;
        Url::parse(endpoint).map_err(|_| AuthError::InvalidEndpoint(endpoint.clone()))
    }
}

/// Leaves requests untouched. Used by services that need no credentials; the
/// client must then be given an explicit base URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthentication;

#[async_trait::async_trait]
impl AuthenticationService for NoAuthentication {
    async fn authenticate_request(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, AuthError> {
        Ok(request)
    }

    async fn base_address(
        &self,
        service_type: &str,
        _service_name: Option<&str>,
        _region: Option<&str>,
        _internal_address: bool,
    ) -> Result<Url, AuthError> {
        Err(AuthError::EndpointNotFound(service_type.to_owned()))
    }
}
