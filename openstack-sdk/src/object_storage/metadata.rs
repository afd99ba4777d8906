use crate::MetadataMap;
use openstack_sdk_common::helper::header_value_to_string;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Which `X-*-Meta-` prefix a metadata set uses.
pub trait MetadataScope {
    const PREFIX: &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountScope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerScope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectScope;

impl MetadataScope for AccountScope {
    const PREFIX: &'static str = "x-account-meta-";
}

impl MetadataScope for ContainerScope {
    const PREFIX: &'static str = "x-container-meta-";
}

impl MetadataScope for ObjectScope {
    const PREFIX: &'static str = "x-object-meta-";
}

/// Response headers of an account, container or object, split in two:
///
/// - `metadata`: user metadata, the scope prefix removed from the key
/// - `headers`: everything else
///
/// Both maps ignore key case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageMetadata<S> {
    headers: MetadataMap,
    metadata: MetadataMap,
    _scope: PhantomData<S>,
}

pub type AccountMetadata = StorageMetadata<AccountScope>;
pub type ContainerMetadata = StorageMetadata<ContainerScope>;
pub type ObjectMetadata = StorageMetadata<ObjectScope>;

impl<S: MetadataScope> StorageMetadata<S> {
    pub fn new(headers: MetadataMap, metadata: MetadataMap) -> Self {
        Self {
            headers,
            metadata,
            _scope: PhantomData,
        }
    }

    /// Repeated headers are joined with `", "`.
    pub fn from_headers(header_map: &HeaderMap) -> Self {
        let mut headers = MetadataMap::new();
        let mut metadata = MetadataMap::new();

        for name in header_map.keys() {
            let value = header_map
                .get_all(name)
                .iter()
                .map(header_value_to_string)
                .collect::<Vec<_>>()
                .join(", ");
            match name.as_str().strip_prefix(S::PREFIX) {
                Some(key) => metadata.insert(key, value),
                None => headers.insert(name.as_str(), value),
            };
        }

        Self::new(headers, metadata)
    }

    pub fn headers(&self) -> &MetadataMap {
        &self.headers
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn headers_mut(&mut self) -> &mut MetadataMap {
        &mut self.headers
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataMap {
        &mut self.metadata
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Overlays `other` on top of `self`, key by key.
    pub fn merge(&mut self, other: &Self) {
        self.headers
            .extend(other.headers.iter().map(|(k, v)| (k.to_owned(), v.to_owned())));
        self.metadata
            .extend(other.metadata.iter().map(|(k, v)| (k.to_owned(), v.to_owned())));
    }

    /// Request headers: plain headers as-is, metadata with the scope prefix.
    pub(crate) fn to_request_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .chain(
                self.metadata
                    .iter()
                    .map(|(k, v)| (format!("{}{k}", S::PREFIX), v.to_owned())),
            )
            .collect()
    }
}

impl StorageMetadata<ObjectScope> {
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }

    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.header("last-modified")
    }
}

impl StorageMetadata<AccountScope> {
    pub fn container_count(&self) -> Option<u64> {
        self.header("x-account-container-count")?.parse().ok()
    }

    pub fn object_count(&self) -> Option<u64> {
        self.header("x-account-object-count")?.parse().ok()
    }

    pub fn bytes_used(&self) -> Option<u64> {
        self.header("x-account-bytes-used")?.parse().ok()
    }
}

impl StorageMetadata<ContainerScope> {
    pub fn object_count(&self) -> Option<u64> {
        self.header("x-container-object-count")?.parse().ok()
    }

    pub fn bytes_used(&self) -> Option<u64> {
        self.header("x-container-bytes-used")?.parse().ok()
    }
}

/// Collects metadata and extra headers on request builders.
///
/// `meta("Color", "blue")` on an object request becomes the header
/// `X-Object-Meta-Color: blue`.
pub trait StorageMetaExt: Sized {
    const PREFIX: &'static str;

    /// The builder's header map.
    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String>;

    fn meta(mut self, key: &str, val: &str) -> Self {
        self.custom_headers_mut()
            .insert(format!("{}{key}", Self::PREFIX).to_ascii_lowercase(), val.to_owned());
        self
    }

    fn metas<'a>(mut self, metas: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (key, val) in metas {
            self.custom_headers_mut()
                .insert(format!("{}{key}", Self::PREFIX).to_ascii_lowercase(), val.to_owned());
        }
        self
    }

    /// Any other request header, e.g. `X-Container-Read`.
    fn header(mut self, name: &str, val: &str) -> Self {
        self.custom_headers_mut()
            .insert(name.to_ascii_lowercase(), val.to_owned());
        self
    }
}
