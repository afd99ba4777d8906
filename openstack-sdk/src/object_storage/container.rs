use super::metadata::{ContainerMetadata, ContainerScope, MetadataScope, StorageMetaExt};
use super::types_rs::ContainerObject;
use super::utils::{UNRESERVED, custom_headers_to_map, removal_headers, validate_container_name};
use super::Client;
use crate::Error;
use crate::page::Page;
use bon::Builder;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use reqwest::Method;
use std::collections::HashMap;

const X_VERSIONS_LOCATION: &str = "x-versions-location";

fn insert_versions_location(headers: &mut HashMap<String, String>, location: Option<&str>) {
    if let Some(location) = location {
        headers.insert(
            X_VERSIONS_LOCATION.to_owned(),
            utf8_percent_encode(location, UNRESERVED).to_string(),
        );
    }
}

// region:    --- create container
/// PUT `{container}`. Creating an existing container updates its metadata.
#[derive(Builder)]
pub struct CreateContainer<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_headers: HashMap<String, String>,

    container: &'a str,
    /// Container that receives old versions of overwritten objects.
    versions_location: Option<&'a str>,
}

impl<S: create_container_builder::State> StorageMetaExt for CreateContainerBuilder<'_, S> {
    const PREFIX: &'static str = ContainerScope::PREFIX;

    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_headers
    }
}

impl CreateContainer<'_> {
    pub async fn send(&self) -> Result<(), Error> {
        validate_container_name(self.container)?;

        let mut headers = self.custom_headers.clone();
        insert_versions_location(&mut headers, self.versions_location);
        let headers = custom_headers_to_map(&headers)?;

        let service = &self.client.service;
        let url = service
            .bind("{container}", &[("container", self.container)])
            .await?;
        let req = service.request(Method::PUT, url).await?;
        service.send(req.headers(headers)).await?;
        Ok(())
    }
}
// endregion: --- create container

// region:    --- list objects
/// GET `{container}`. Also returns the container metadata.
#[derive(Builder)]
pub struct ListObjects<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    limit: Option<u32>,
    prefix: Option<&'a str>,
    /// Roll names up to this character into `subdir` entries.
    delimiter: Option<char>,
    /// Objects nested directly under this pseudo-directory.
    path: Option<&'a str>,
    marker: Option<&'a str>,
    end_marker: Option<&'a str>,
    #[builder(default)]
    newest: bool,
}

impl ListObjects<'_> {
    pub async fn send(&self) -> Result<(ContainerMetadata, Page<ContainerObject>), Error> {
        validate_container_name(self.container)?;

        let limit = self.limit.map(|v| v.to_string());
        let delimiter = self.delimiter.map(String::from);
        let params: Vec<(&str, &str)> = [
            ("container", Some(self.container)),
            ("limit", limit.as_deref()),
            ("prefix", self.prefix),
            ("delimiter", delimiter.as_deref()),
            ("path", self.path),
            ("marker", self.marker),
            ("end_marker", self.end_marker),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();

        let url = self
            .client
            .service
            .bind(
                "{container}{?limit,prefix,delimiter,path,marker,end_marker}",
                &params,
            )
            .await?;
        self.client.fetch_listing(url, self.newest).await
    }
}
// endregion: --- list objects

// region:    --- container metadata
#[derive(Builder)]
pub struct GetContainerMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    #[builder(default)]
    newest: bool,
}

impl GetContainerMetadata<'_> {
    pub async fn send(&self) -> Result<ContainerMetadata, Error> {
        validate_container_name(self.container)?;
        let url = self
            .client
            .service
            .bind("{container}", &[("container", self.container)])
            .await?;
        self.client.head_metadata(url, self.newest).await
    }
}

/// POST `{container}`. Only the given keys change, the rest stays.
#[derive(Builder)]
pub struct UpdateContainerMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_headers: HashMap<String, String>,

    container: &'a str,
    /// An empty value turns versioning off.
    versions_location: Option<&'a str>,
}

impl<S: update_container_metadata_builder::State> StorageMetaExt
    for UpdateContainerMetadataBuilder<'_, S>
{
    const PREFIX: &'static str = ContainerScope::PREFIX;

    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_headers
    }
}

impl UpdateContainerMetadata<'_> {
    pub async fn send(&self) -> Result<(), Error> {
        validate_container_name(self.container)?;

        let mut headers = self.custom_headers.clone();
        insert_versions_location(&mut headers, self.versions_location);
        let headers = custom_headers_to_map(&headers)?;

        let url = self
            .client
            .service
            .bind("{container}", &[("container", self.container)])
            .await?;
        self.client.post_headers(url, headers).await
    }
}
// endregion: --- container metadata

impl ContainerMetadata {
    /// Decoded `X-Versions-Location`, `None` when versioning is off.
    pub fn versions_location(&self) -> Option<String> {
        let raw = self.header(X_VERSIONS_LOCATION).filter(|v| !v.is_empty())?;
        Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
    }
}

impl Client {
    pub fn create_container(&self) -> CreateContainerBuilder<'_> {
        CreateContainer::builder(self)
    }

    pub fn list_objects(&self) -> ListObjectsBuilder<'_> {
        ListObjects::builder(self)
    }

    pub fn get_container_metadata(&self) -> GetContainerMetadataBuilder<'_> {
        GetContainerMetadata::builder(self)
    }

    pub fn update_container_metadata(&self) -> UpdateContainerMetadataBuilder<'_> {
        UpdateContainerMetadata::builder(self)
    }

    /// Creates `container` with old object versions kept in `versions_location`.
    pub async fn create_versioned_container(
        &self,
        container: &str,
        versions_location: &str,
    ) -> Result<(), Error> {
        validate_container_name(versions_location)?;
        self.create_container()
            .container(container)
            .versions_location(versions_location)
            .build()
            .send()
            .await
    }

    pub async fn set_versions_location(
        &self,
        container: &str,
        versions_location: &str,
    ) -> Result<(), Error> {
        validate_container_name(versions_location)?;
        self.update_container_metadata()
            .container(container)
            .versions_location(versions_location)
            .build()
            .send()
            .await
    }

    /// Turns versioning off. Versions already stored stay where they are.
    pub async fn remove_versions_location(&self, container: &str) -> Result<(), Error> {
        self.update_container_metadata()
            .container(container)
            .versions_location("")
            .build()
            .send()
            .await
    }

    /// The container must be empty.
    pub async fn remove_container(&self, container: &str) -> Result<(), Error> {
        validate_container_name(container)?;
        let url = self
            .service
            .bind("{container}", &[("container", container)])
            .await?;
        let req = self.service.request(Method::DELETE, url).await?;
        self.service.send(req).await?;
        Ok(())
    }

    pub async fn remove_container_metadata(
        &self,
        container: &str,
        keys: &[&str],
    ) -> Result<(), Error> {
        validate_container_name(container)?;
        let headers = removal_headers(ContainerScope::PREFIX, keys)?;
        let url = self
            .service
            .bind("{container}", &[("container", container)])
            .await?;
        self.post_headers(url, headers).await
    }
}
