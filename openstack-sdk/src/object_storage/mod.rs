//! Object Storage V1 (Swift) client.
//!
//! API reference: <https://docs.openstack.org/api-ref/object-store/>
//!
//! Besides the core account/container/object API this module covers the
//! middleware most clusters enable. Call [`Client::get_info`] to see which of
//! them a cluster actually runs:
//!
//! - form POST uploads ([`form_post`])
//! - static websites ([`static_website`])
//! - container quotas ([`quota`])
//! - scheduled deletion ([`scheduled_deletion`])
//! - archive extraction ([`extract_archive`])
//! - large object limits ([`StorageInfo`])

pub mod account;
pub mod container;
pub mod extract_archive;
pub mod form_post;
pub mod metadata;
pub mod object;
pub mod quota;
pub mod scheduled_deletion;
pub mod static_website;
pub mod types_rs;

pub(crate) mod utils;

pub use metadata::{
    AccountMetadata, ContainerMetadata, MetadataScope, ObjectMetadata, StorageMetaExt,
    StorageMetadata,
};
pub use types_rs::StorageInfo;

use crate::auth::AuthenticationService;
use crate::page::Page;
use crate::service::{ServiceClient, ServiceClientConfig, json, json_or_default};
use crate::Error;
use async_stream::try_stream;
use bon::bon;
use metadata::{AccountScope, ContainerScope};
use openstack_sdk_common::helper::set_query_parameter;
use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_stream::Stream;
use types_rs::{Container, ContainerObject};
use url::Url;

pub const SERVICE_TYPE: &str = "object-store";

const X_NEWEST: &str = "X-Newest";

pub struct Client {
    service: ServiceClient,
}

/// Build an object storage client
#[bon]
impl Client {
    /// - `region`: region passed to the authentication service when resolving the endpoint
    /// - `internal_address`: use the internal (service network) endpoint
    /// - `base_uri`: skip endpoint resolution and use this URI, e.g. `https://swift.example.com/v1/AUTH_tenant`
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

/// An entry of a marker-paginated listing.
pub trait Listing: DeserializeOwned {
    /// Scope of the metadata returned next to the listing.
    type Scope: MetadataScope;

    /// Value of `marker` that continues after this entry.
    fn marker(&self) -> &str;
}

impl Listing for Container {
    type Scope = AccountScope;

    fn marker(&self) -> &str {
        &self.name
    }
}

impl Listing for ContainerObject {
    type Scope = ContainerScope;

    fn marker(&self) -> &str {
        match &self.subdir {
            Some(subdir) if self.name.is_empty() => subdir,
            _ => &self.name,
        }
    }
}

fn with_newest(req: RequestBuilder, newest: bool) -> RequestBuilder {
    if newest {
        req.header(X_NEWEST, "true")
    } else {
        req
    }
}

impl Client {
    /// GET `/info`, served at the root of the host rather than under the account.
    pub async fn get_info(&self) -> Result<StorageInfo, Error> {
        let url = self.service.bind("/info", &[]).await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        json(resp).await
    }

    pub(crate) async fn fetch_listing<T: Listing>(
        &self,
        url: Url,
        newest: bool,
    ) -> Result<(StorageMetadata<T::Scope>, Page<T>), Error> {
        let req = self.service.request(Method::GET, url.clone()).await?;
        let resp = self.service.send(with_newest(req, newest)).await?;
        let metadata = StorageMetadata::from_headers(resp.headers());
        let items: Vec<T> = json_or_default(resp).await?;

        // an empty page ends the listing
        let next = items.last().map(|last| {
            let mut next = url.clone();
            set_query_parameter(&mut next, "marker", last.marker());
            next
        });
        Ok((metadata, Page::new(items, next)))
    }

    /// Fetches the page after `page`, `None` on the last page.
    pub async fn next_page<T: Listing>(&self, page: &Page<T>) -> Result<Option<Page<T>>, Error> {
        match page.next_page_uri() {
            Some(url) => {
                let (_, next) = self.fetch_listing(url.clone(), false).await?;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    /// Yields `first` and every non-empty page after it.
    pub fn pages<T: Listing>(
        &self,
        first: Page<T>,
    ) -> impl Stream<Item = Result<Page<T>, Error>> {
        try_stream! {
            let mut current = Some(first);
            while let Some(page) = current.take() {
                let next = page.next_page_uri().cloned();
                if !page.is_empty() {
                    yield page;
                }
                if let Some(url) = next {
                    let (_, page) = self.fetch_listing::<T>(url, false).await?;
                    current = Some(page);
                }
            }
        }
    }

    pub(crate) async fn head_metadata<S: MetadataScope>(
        &self,
        url: Url,
        newest: bool,
    ) -> Result<StorageMetadata<S>, Error> {
        let req = self.service.request(Method::HEAD, url).await?;
        let resp = self.service.send(with_newest(req, newest)).await?;
        Ok(StorageMetadata::from_headers(resp.headers()))
    }

    pub(crate) async fn post_headers(&self, url: Url, headers: HeaderMap) -> Result<(), Error> {
        let req = self.service.request(Method::POST, url).await?;
        self.service.send(req.headers(headers)).await?;
        Ok(())
    }
}
