//! Scheduled object deletion (`X-Delete-After` / `X-Delete-At`).
//!
//! The expirer removes an object once its `X-Delete-At` time has passed.
//! `X-Delete-After` is converted to `X-Delete-At` by the proxy.

use super::metadata::ObjectMetadata;
use super::Client;
use crate::Error;
use std::collections::HashMap;
use time::OffsetDateTime;

const X_DELETE_AFTER: &str = "x-delete-after";
const X_DELETE_AT: &str = "x-delete-at";

pub(crate) fn insert_deletion_headers(
    headers: &mut HashMap<String, String>,
    delete_after: Option<u64>,
    delete_at: Option<&OffsetDateTime>,
) {
    if let Some(seconds) = delete_after {
        headers.insert(X_DELETE_AFTER.to_owned(), seconds.to_string());
    }
    if let Some(at) = delete_at {
        headers.insert(X_DELETE_AT.to_owned(), at.unix_timestamp().to_string());
    }
}

impl ObjectMetadata {
    /// When the object is due for deletion, if scheduled.
    pub fn scheduled_deletion_time(&self) -> Option<OffsetDateTime> {
        let ts: i64 = self.header(X_DELETE_AT)?.trim().parse().ok()?;
        OffsetDateTime::from_unix_timestamp(ts).ok()
    }
}

impl Client {
    /// Schedules deletion `seconds` from now.
    pub async fn set_object_delete_after(
        &self,
        container: &str,
        object: &str,
        seconds: u64,
    ) -> Result<(), Error> {
        let updates = ObjectMetadata::default().with_header(X_DELETE_AFTER, seconds.to_string());
        self.update_object_metadata(container, object, &updates)
            .await
    }

    pub async fn set_object_delete_at(
        &self,
        container: &str,
        object: &str,
        at: OffsetDateTime,
    ) -> Result<(), Error> {
        let updates =
            ObjectMetadata::default().with_header(X_DELETE_AT, at.unix_timestamp().to_string());
        self.update_object_metadata(container, object, &updates)
            .await
    }

    /// Cancels a scheduled deletion.
    pub async fn remove_object_scheduled_deletion(
        &self,
        container: &str,
        object: &str,
    ) -> Result<(), Error> {
        // an empty value is dropped by set_object_metadata, and a POST without
        // X-Delete-At clears the schedule
        let updates = ObjectMetadata::default().with_header(X_DELETE_AT, "");
        self.update_object_metadata(container, object, &updates)
            .await
    }
}
