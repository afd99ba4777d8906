//! Client for an httpbin-style echo service, used to check connectivity and
//! to see exactly what the SDK puts on the wire.
//!
//! The service needs no authentication.

use crate::Error;
use crate::auth::{AuthenticationService, NoAuthentication};
use crate::service::{ServiceClient, ServiceClientConfig, json};
use bon::{Builder, bon};
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

pub const SERVICE_TYPE: &str = "echo";
pub const DEFAULT_BASE_URI: &str = "http://httpbin.org";

pub struct Client {
    service: ServiceClient,
}

#[bon]
impl Client {
    /// `base_uri` defaults to [`DEFAULT_BASE_URI`]; `auth` defaults to [`NoAuthentication`].
    #[builder(on(String, into))]
    pub fn new(
        #[builder(default = DEFAULT_BASE_URI.to_owned())] base_uri: String,
        auth: Option<Arc<dyn AuthenticationService>>,
        http_client: Option<reqwest::Client>,
    ) -> Self {
        let config = ServiceClientConfig {
            service_type: SERVICE_TYPE,
            service_name: None,
            region: None,
            internal_address: false,
            base_uri: Some(base_uri),
            http_client,
        };
        let auth = auth.unwrap_or_else(|| Arc::new(NoAuthentication));
        Self {
            service: ServiceClient::new(auth, config),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EchoResponse {
    #[serde(default)]
    pub args: HashMap<String, String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Caller address as seen by the service. Proxies may append theirs,
    /// comma separated.
    pub origin: Option<String>,
    pub url: Option<String>,
}

impl EchoResponse {
    pub fn origin_ip(&self) -> Option<IpAddr> {
        self.origin.as_deref()?.split(',').next()?.trim().parse().ok()
    }

    /// Request header as received, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// GET `/get{?m}`
#[derive(Builder)]
pub struct Echo<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    /// Echoed back under `args.m`.
    message: Option<&'a str>,
}

impl Echo<'_> {
    pub async fn send(&self) -> Result<EchoResponse, Error> {
        let service = &self.client.service;
        let params: Vec<(&str, &str)> = self.message.map(|m| ("m", m)).into_iter().collect();
        let url = service.bind("/get{?m}", &params).await?;
        let req = service.request(Method::GET, url).await?;
        let resp = service.send(req).await?;
        json(resp).await
    }
}

impl Client {
    pub fn echo(&self) -> EchoBuilder<'_> {
        Echo::builder(self)
    }
}
