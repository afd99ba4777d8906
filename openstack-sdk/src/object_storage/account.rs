use super::metadata::{AccountMetadata, AccountScope, MetadataScope, StorageMetaExt};
use super::types_rs::Container;
use super::utils::{custom_headers_to_map, removal_headers};
use super::Client;
use crate::Error;
use crate::page::Page;
use bon::Builder;
use std::collections::HashMap;

// region:    --- list containers
/// GET on the account. Also returns the account metadata.
#[derive(Builder)]
pub struct ListContainers<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    limit: Option<u32>,
    prefix: Option<&'a str>,
    marker: Option<&'a str>,
    end_marker: Option<&'a str>,
    /// Ask for the most recent replica (`X-Newest`).
    #[builder(default)]
    newest: bool,
}

impl ListContainers<'_> {
    pub async fn send(&self) -> Result<(AccountMetadata, Page<Container>), Error> {
        let limit = self.limit.map(|v| v.to_string());
        let params: Vec<(&str, &str)> = [
            ("limit", limit.as_deref()),
            ("prefix", self.prefix),
            ("marker", self.marker),
            ("end_marker", self.end_marker),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();

        let url = self
            .client
            .service
            .bind("{?limit,prefix,marker,end_marker}", &params)
            .await?;
        self.client.fetch_listing(url, self.newest).await
    }
}
// endregion: --- list containers

// region:    --- account metadata
#[derive(Builder)]
pub struct GetAccountMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(default)]
    newest: bool,
}

impl GetAccountMetadata<'_> {
    pub async fn send(&self) -> Result<AccountMetadata, Error> {
        let url = self.client.service.bind("", &[]).await?;
        self.client.head_metadata(url, self.newest).await
    }
}

/// POST on the account. Only the given keys change, the rest stays.
#[derive(Builder)]
pub struct UpdateAccountMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_headers: HashMap<String, String>,
}

impl<S: update_account_metadata_builder::State> StorageMetaExt
    for UpdateAccountMetadataBuilder<'_, S>
{
    const PREFIX: &'static str = AccountScope::PREFIX;

    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_headers
    }
}

impl UpdateAccountMetadata<'_> {
    pub async fn send(&self) -> Result<(), Error> {
        let headers = custom_headers_to_map(&self.custom_headers)?;
        let url = self.client.service.bind("", &[]).await?;
        self.client.post_headers(url, headers).await
    }
}
// endregion: --- account metadata

impl Client {
    pub fn list_containers(&self) -> ListContainersBuilder<'_> {
        ListContainers::builder(self)
    }

    pub fn get_account_metadata(&self) -> GetAccountMetadataBuilder<'_> {
        GetAccountMetadata::builder(self)
    }

    pub fn update_account_metadata(&self) -> UpdateAccountMetadataBuilder<'_> {
        UpdateAccountMetadata::builder(self)
    }

    pub async fn remove_account_metadata(&self, keys: &[&str]) -> Result<(), Error> {
        let headers = removal_headers(AccountScope::PREFIX, keys)?;
        let url = self.service.bind("", &[]).await?;
        self.post_headers(url, headers).await
    }
}
