//! Compute V2 (Nova) client.
//!
//! API reference: <https://docs.openstack.org/api-ref/compute/>
//!
//! Listings are paginated. The first page comes from the `list_*` builders,
//! further pages from [`Client::next_page`] or [`Client::pages`], which follow
//! the `next` link the service returns next to each collection.

pub mod extension;
pub mod flavor;
pub mod image;
pub mod metadata;
pub mod server;
pub mod types_rs;

use crate::auth::AuthenticationService;
use crate::page::Page;
use crate::service::{ServiceClient, ServiceClientConfig, json};
use crate::Error;
use async_stream::try_stream;
use bon::bon;
use openstack_sdk_common::helper::format_rfc3339;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_stream::Stream;
use types_rs::{Flavor, Image, Link, Server};
use url::Url;

pub const SERVICE_TYPE: &str = "compute";

pub struct Client {
    service: ServiceClient,
}

/// Build a compute client
#[bon]
impl Client {
    /// - `region`: region passed to the authentication service when resolving the endpoint
    /// - `internal_address`: use the internal (service network) endpoint
    /// - `base_uri`: skip endpoint resolution and use this URI
    #[builder(on(String, into))]
    pub fn new(
        auth: Arc<dyn AuthenticationService>,
        region: Option<String>,
        service_name: Option<String>,
        #[builder(default)] internal_address: bool,
        base_uri: Option<String>,
        http_client: Option<reqwest::Client>,
    ) -> Self {
        let config = ServiceClientConfig {
            service_type: SERVICE_TYPE,
            service_name,
            region,
            internal_address,
            base_uri,
            http_client,
        };
        Self {
            service: ServiceClient::new(auth, config),
        }
    }
}

/// A resource that is listed through a paginated collection.
pub trait Paginated: DeserializeOwned {
    /// Name of the collection in the response body, e.g. `servers`.
    const COLLECTION: &'static str;
}

impl Paginated for Server {
    const COLLECTION: &'static str = "servers";
}

impl Paginated for Flavor {
    const COLLECTION: &'static str = "flavors";
}

impl Paginated for Image {
    const COLLECTION: &'static str = "images";
}

impl Client {
    pub(crate) async fn fetch_page<T: Paginated>(&self, url: Url) -> Result<Page<T>, Error> {
        let req = self.service.request(Method::GET, url.clone()).await?;
        let resp = self.service.send(req).await?;
        let mut body: Map<String, Value> = json(resp).await?;

        let items = match body.remove(T::COLLECTION) {
            Some(v) => serde_json::from_value(v)?,
            None => Vec::new(),
        };
        let links: Vec<Link> = match body.remove(&format!("{}_links", T::COLLECTION)) {
            Some(v) => serde_json::from_value(v)?,
            None => Vec::new(),
        };
        let next = links
            .iter()
            .find(|l| l.rel.eq_ignore_ascii_case("next"))
            .map(|l| {
                url.join(&l.href)
                    .map_err(|e| Error::Common(format!("invalid next link `{}`: {e}", l.href)))
            })
            .transpose()?;

        Ok(Page::new(items, next))
    }

    /// Fetches the page after `page`, `None` on the last page.
    pub async fn next_page<T: Paginated>(&self, page: &Page<T>) -> Result<Option<Page<T>>, Error> {
        match page.next_page_uri() {
            Some(url) => Ok(Some(self.fetch_page(url.clone()).await?)),
            None => Ok(None),
        }
    }

    /// Yields `first` and every page after it.
    pub fn pages<T: Paginated>(
        &self,
        first: Page<T>,
    ) -> impl Stream<Item = Result<Page<T>, Error>> {
        try_stream! {
            let mut current = Some(first);
            while let Some(page) = current.take() {
                let next = page.next_page_uri().cloned();
                yield page;
                if let Some(url) = next {
                    current = Some(self.fetch_page::<T>(url).await?);
                }
            }
        }
    }

    /// POST `servers/{server_id}/action`
    pub(crate) async fn server_action<B: serde::Serialize + ?Sized>(
        &self,
        server_id: &str,
        body: &B,
    ) -> Result<reqwest::Response, Error> {
        let url = self
            .service
            .bind("servers/{server_id}/action", &[("server_id", server_id)])
            .await?;
        let req = self.service.request(Method::POST, url).await?;
        let req = crate::service::with_json_body(req, body)?;
        self.service.send(req).await
    }
}

/// Query parameters shared by the paginated listings.
pub(crate) fn paging_params(
    limit: Option<u32>,
    marker: Option<&str>,
    changes_since: Option<&OffsetDateTime>,
) -> Result<Vec<(&'static str, String)>, Error> {
    let mut params = Vec::new();
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(marker) = marker {
        params.push(("marker", marker.to_owned()));
    }
    if let Some(dt) = changes_since {
        params.push(("changes-since", format_rfc3339(dt)?));
    }
    Ok(params)
}

pub(crate) fn as_str_params<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Adds arbitrary fields to a request body, for API extensions the typed
/// builders do not model (e.g. `OS-DCF:diskConfig`).
pub trait ExtensionDataExt: Sized {
    fn extension_data_mut(&mut self) -> &mut Map<String, Value>;

    fn extension_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extension_data_mut().insert(key.to_owned(), value.into());
        self
    }
}

/// Collects `metadata` entries on builders that accept them.
pub trait ComputeMetaExt: Sized {
    fn metadata_mut(&mut self) -> &mut HashMap<String, String>;

    fn meta(mut self, key: &str, val: &str) -> Self {
        self.metadata_mut().insert(key.to_owned(), val.to_owned());
        self
    }

    fn metas<'a>(mut self, metas: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (key, val) in metas {
            self.metadata_mut().insert(key.to_owned(), val.to_owned());
        }
        self
    }
}
