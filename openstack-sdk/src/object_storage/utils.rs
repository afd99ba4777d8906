use crate::Error;
use openstack_sdk_common::helper::try_into_header_map;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::HeaderMap;
use std::collections::HashMap;

pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Like [`UNRESERVED`] but keeps `/`, for object paths in headers.
pub(crate) const OBJECT_PATH: &AsciiSet = &UNRESERVED.remove(b'/');

pub(crate) fn validate_container_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Common("container name cannot be empty".to_owned()));
    }
    if name.contains('/') {
        return Err(Error::Common(format!(
            "container name `{name}` cannot contain `/`"
        )));
    }
    Ok(())
}

pub(crate) fn validate_object_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Common("object name cannot be empty".to_owned()));
    }
    Ok(())
}

/// Turns builder-collected headers into a header map, rejecting metadata
/// entries with an empty key.
pub(crate) fn custom_headers_to_map(headers: &HashMap<String, String>) -> Result<HeaderMap, Error> {
    if let Some(name) = headers.keys().find(|k| k.ends_with("-meta-")) {
        return Err(Error::Common(format!("empty metadata key in header `{name}`")));
    }
    Ok(try_into_header_map(headers)?)
}

/// Metadata entries with empty values, which Swift treats as removals.
pub(crate) fn removal_headers(prefix: &str, keys: &[&str]) -> Result<HeaderMap, Error> {
    if keys.iter().any(|k| k.is_empty()) {
        return Err(Error::Common("metadata key cannot be empty".to_owned()));
    }
    Ok(try_into_header_map(
        keys.iter().map(|k| (format!("{prefix}{k}"), "")),
    )?)
}
