//! Container quotas, available when `/info` lists `container_quotas`.

use super::metadata::{ContainerMetadata, ContainerScope, MetadataScope};
use super::utils::{custom_headers_to_map, validate_container_name};
use super::Client;
use crate::Error;
use std::collections::HashMap;

const QUOTA_BYTES: &str = "Quota-Bytes";
const QUOTA_COUNT: &str = "Quota-Count";

impl ContainerMetadata {
    /// Size limit in bytes.
    pub fn quota_bytes(&self) -> Option<i64> {
        self.meta(QUOTA_BYTES)?.parse().ok()
    }

    /// Object count limit.
    pub fn quota_count(&self) -> Option<i64> {
        self.meta(QUOTA_COUNT)?.parse().ok()
    }
}

impl Client {
    pub async fn supports_container_quotas(&self) -> Result<bool, Error> {
        Ok(self.get_info().await?.supports_container_quotas())
    }

    /// Sets the given quotas; `None` leaves that quota as it is. Use
    /// [`Client::remove_container_quota`] to drop them.
    pub async fn set_container_quota(
        &self,
        container: &str,
        max_bytes: Option<i64>,
        max_count: Option<i64>,
    ) -> Result<(), Error> {
        validate_container_name(container)?;
        let prefix = ContainerScope::PREFIX;
        let headers: HashMap<String, String> = [(QUOTA_BYTES, max_bytes), (QUOTA_COUNT, max_count)]
            .into_iter()
            .filter_map(|(key, value)| {
                value.map(|v| (format!("{prefix}{key}").to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let url = self
            .service
            .bind("{container}", &[("container", container)])
            .await?;
        self.post_headers(url, custom_headers_to_map(&headers)?)
            .await
    }

    pub async fn remove_container_quota(&self, container: &str) -> Result<(), Error> {
        self.remove_container_metadata(container, &[QUOTA_BYTES, QUOTA_COUNT])
            .await
    }
}
