//! Bulk upload through the `bulk_upload` middleware: the cluster unpacks an
//! archive into containers and objects.

use super::object::attach_body;
use super::types_rs::{ArchiveFormat, ExtractArchiveResponse, ObjectBody};
use super::utils::validate_container_name;
use super::Client;
use crate::Error;
use crate::service::json;
use bon::Builder;
use openstack_sdk_common::helper::set_query_parameter;
use reqwest::Method;

/// PUT `[{container}[/{object_prefix}]]?extract-archive={format}`
///
/// Without a container the top-level directories of the archive become containers.
#[derive(Builder)]
pub struct ExtractArchive<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: Option<&'a str>,
    object_prefix: Option<&'a str>,
    format: ArchiveFormat,
}

impl ExtractArchive<'_> {
    pub async fn send(&self, body: ObjectBody<'_>) -> Result<ExtractArchiveResponse, Error> {
        let service = &self.client.service;
        let mut url = match (self.container, self.object_prefix) {
            (None, None) => service.bind("", &[]).await?,
            (Some(container), None) => {
                validate_container_name(container)?;
                service.bind("{container}", &[("container", container)]).await?
            }
            (Some(container), Some(prefix)) => {
                validate_container_name(container)?;
                service
                    .bind(
                        "{container}/{+object_prefix}",
                        &[("container", container), ("object_prefix", prefix)],
                    )
                    .await?
            }
            (None, Some(_)) => {
                return Err(Error::Common(
                    "object_prefix requires a container".to_owned(),
                ));
            }
        };
        set_query_parameter(&mut url, "extract-archive", self.format.as_str());

        let req = service.request(Method::PUT, url).await?;
        let req = attach_body(req, body, false).await?;
        let resp = service.send(req).await?;
        json(resp).await
    }
}

impl Client {
    pub fn extract_archive(&self) -> ExtractArchiveBuilder<'_> {
        ExtractArchive::builder(self)
    }

    pub async fn supports_extract_archive(&self) -> Result<bool, Error> {
        Ok(self.get_info().await?.supports_extract_archive())
    }
}
