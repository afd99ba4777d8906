//! Request plumbing shared by the service clients.
//!
//! Every call goes through the same steps: resolve the base URI, bind the URI
//! template, attach headers and body, let the authentication service decorate
//! the request, send it and check the status.

use crate::Error;
use crate::auth::AuthenticationService;
use openstack_sdk_common::UriTemplate;
use openstack_sdk_common::helper::{failed_response_error, parse_json_response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};
use url::Url;

const SDK_USER_AGENT: &str = concat!("openstack-sdk/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

pub(crate) struct ServiceClient {
    auth: Arc<dyn AuthenticationService>,
    http_client: reqwest::Client,
    service_type: &'static str,
    service_name: Option<String>,
    region: Option<String>,
    internal_address: bool,
    configured_base_uri: Option<String>,
    base_uri: OnceLock<Url>,
}

pub(crate) struct ServiceClientConfig {
    pub(crate) service_type: &'static str,
    pub(crate) service_name: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) internal_address: bool,
    pub(crate) base_uri: Option<String>,
    pub(crate) http_client: Option<reqwest::Client>,
}

impl ServiceClient {
    pub(crate) fn new(auth: Arc<dyn AuthenticationService>, config: ServiceClientConfig) -> Self {
        Self {
            auth,
            http_client: config.http_client.unwrap_or_default(),
            service_type: config.service_type,
            service_name: config.service_name,
            region: config.region,
            internal_address: config.internal_address,
            configured_base_uri: config.base_uri,
            base_uri: OnceLock::new(),
        }
    }

    /// Base URI of the service, resolved once and then reused.
    pub(crate) async fn base_uri(&self) -> Result<Url, Error> {
        if let Some(uri) = self.base_uri.get() {
            return Ok(uri.clone());
        }

        let uri = match &self.configured_base_uri {
            Some(s) => Url::parse(s)
                .map_err(|e| Error::Common(format!("invalid base uri `{s}`: {e}")))?,
            None => {
                self.auth
                    .base_address(
                        self.service_type,
                        self.service_name.as_deref(),
                        self.region.as_deref(),
                        self.internal_address,
                    )
                    .await?
            }
        };
        debug!(service_type = self.service_type, base_uri = %uri, "resolved service endpoint");
        // a concurrent caller may have won the race, both values are equal
        let _ = self.base_uri.set(uri.clone());
        Ok(uri)
    }

    pub(crate) async fn bind(&self, template: &str, params: &[(&str, &str)]) -> Result<Url, Error> {
        let base = self.base_uri().await?;
        Ok(UriTemplate::new(template)?.bind(&base, params)?)
    }

    /// Starts a request with the default headers and authentication applied.
    pub(crate) async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, Error> {
        let builder = self
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, SDK_USER_AGENT);
        Ok(self.auth.authenticate_request(builder).await?)
    }

    /// Sends the request; a non-success status becomes [`Error::RequestAPIFailed`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let resp = self.http_client.execute(request).await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%method, %url, %status, "request failed");
            return Err(failed_response_error(resp).await.into());
        }
        debug!(%method, %url, %status, "request succeeded");
        Ok(resp)
    }
}

pub(crate) fn with_json_body<T: Serialize + ?Sized>(
    request: RequestBuilder,
    body: &T,
) -> Result<RequestBuilder, Error> {
    let bytes = serde_json::to_vec(body)?;
    Ok(request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes))
}

/// Decodes a JSON body. Empty bodies (e.g. `204 No Content`) decode as `T::default()`.
pub(crate) async fn json_or_default<T>(resp: Response) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, Error> {
    Ok(parse_json_response(resp).await?)
}
