use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// An entry of an account listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    /// number of objects
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub bytes: u64,
    pub last_modified: Option<String>,
}

/// An entry of a container listing.
///
/// Listings with a `delimiter` also return pseudo-directories, which only
/// carry `subdir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerObject {
    #[serde(default)]
    pub name: String,
    pub subdir: Option<String>,
    pub hash: Option<String>,
    #[serde(default)]
    pub bytes: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
}

impl ContainerObject {
    pub fn is_directory(&self) -> bool {
        self.subdir.is_some()
    }
}

/// Capabilities published by `GET /info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageInfo(pub Map<String, Value>);

impl StorageInfo {
    pub fn get(&self, capability: &str) -> Option<&Value> {
        self.0.get(capability)
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.0.contains_key(capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn int_setting(&self, capability: &str, key: &str) -> Option<i64> {
        self.get(capability)?.get(key)?.as_i64()
    }

    pub fn supports_form_post(&self) -> bool {
        self.supports("formpost")
    }

    pub fn supports_static_website(&self) -> bool {
        self.supports("staticweb")
    }

    pub fn supports_container_quotas(&self) -> bool {
        self.supports("container_quotas")
    }

    pub fn supports_extract_archive(&self) -> bool {
        self.supports("bulk_upload")
    }

    pub fn supports_static_large_objects(&self) -> bool {
        self.supports("slo")
    }

    // region:    --- large object limits
    pub fn max_manifest_segments(&self) -> Option<i64> {
        self.int_setting("slo", "max_manifest_segments")
    }

    /// bytes
    pub fn min_segment_size(&self) -> Option<i64> {
        self.int_setting("slo", "min_segment_size")
    }

    /// bytes
    pub fn max_manifest_size(&self) -> Option<i64> {
        self.int_setting("slo", "max_manifest_size")
    }

    /// Largest single object, in bytes.
    pub fn max_object_size(&self) -> Option<i64> {
        self.int_setting("swift", "max_file_size")
    }
    // endregion: --- large object limits
}

/// Body of an upload.
pub enum ObjectBody<'a> {
    Bytes(Vec<u8>),
    FilePath(&'a Path),
}

/// `Range` header of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// `bytes=start-`
    From(u64),
    /// `bytes=start-end`, both inclusive
    Between(u64, u64),
    /// `bytes=-n`, the last n bytes
    Last(u64),
}

impl ByteRange {
    pub(crate) fn to_header_value(self) -> String {
        match self {
            ByteRange::From(start) => format!("bytes={start}-"),
            ByteRange::Between(start, end) => format!("bytes={start}-{end}"),
            ByteRange::Last(n) => format!("bytes=-{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    TarBz2,
}

impl ArchiveFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarBz2 => "tar.bz2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractArchiveResponse {
    #[serde(rename = "Number Files Created", default)]
    pub files_created: u64,
    #[serde(rename = "Response Status")]
    pub status: String,
    #[serde(rename = "Response Body", default)]
    pub body: String,
    /// `(path, status)` of every entry that failed
    #[serde(rename = "Errors", default)]
    pub errors: Vec<(String, String)>,
}

impl ExtractArchiveResponse {
    /// The HTTP status of the upload is always 200, the outcome is in `status`.
    pub fn is_success(&self) -> bool {
        self.status.starts_with('2') && self.errors.is_empty()
    }
}
