use super::metadata::{MetadataScope, ObjectMetadata, ObjectScope, StorageMetaExt};
use super::scheduled_deletion::insert_deletion_headers;
use super::types_rs::{ByteRange, ObjectBody};
use super::utils::{
    OBJECT_PATH, custom_headers_to_map, validate_container_name, validate_object_name,
};
use super::{Client, with_newest};
use crate::Error;
use bon::Builder;
use bytes::Bytes;
use md5::{Digest, Md5};
use percent_encoding::utf8_percent_encode;
use reqwest::{Method, RequestBuilder};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, RANGE};
use std::collections::HashMap;
use std::path::Path;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Response headers that describe the stored object rather than settable metadata.
const READ_ONLY_HEADERS: [&str; 11] = [
    "content-length",
    "etag",
    "accept-ranges",
    "x-timestamp",
    "date",
    "last-modified",
    "x-trans-id",
    "x-openstack-request-id",
    "transfer-encoding",
    "connection",
    "x-static-large-object",
];

/// Sets the request body. File bodies are streamed; in-memory bodies can
/// carry their MD5 as `ETag` so the cluster verifies them.
pub(crate) async fn attach_body(
    req: RequestBuilder,
    body: ObjectBody<'_>,
    with_etag: bool,
) -> Result<RequestBuilder, Error> {
    Ok(match body {
        ObjectBody::Bytes(data) => {
            let req = if with_etag {
                req.header(ETAG, hex::encode(Md5::digest(&data)))
            } else {
                req
            };
            req.body(data)
        }
        ObjectBody::FilePath(path) => {
            let file = tokio::fs::File::open(path).await?;
            let len = file.metadata().await?.len();
            debug!(path = %path.display(), len, "streaming file body");
            let stream = tokio_util::io::ReaderStream::new(file);
            req.header(CONTENT_LENGTH, len)
                .body(reqwest::Body::wrap_stream(stream))
        }
    })
}

// region:    --- create object
/// PUT `{container}/{object}`
///
/// - content_length: added automatically for file bodies
/// - etag: MD5 of in-memory bodies, added automatically
#[derive(Builder)]
pub struct CreateObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_headers: HashMap<String, String>,

    container: &'a str,
    object: &'a str,
    /// Swift guesses from the name when unset.
    content_type: Option<&'a str>,
    /// seconds
    delete_after: Option<u64>,
    delete_at: Option<OffsetDateTime>,
}

impl<S: create_object_builder::State> StorageMetaExt for CreateObjectBuilder<'_, S> {
    const PREFIX: &'static str = ObjectScope::PREFIX;

    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_headers
    }
}

impl CreateObject<'_> {
    /// Returns the response headers, which carry the `ETag` of the stored object.
    pub async fn send(&self, body: ObjectBody<'_>) -> Result<ObjectMetadata, Error> {
        validate_container_name(self.container)?;
        validate_object_name(self.object)?;

        let mut headers = self.custom_headers.clone();
        if let Some(content_type) = self.content_type {
            headers.insert(CONTENT_TYPE.as_str().to_owned(), content_type.to_owned());
        }
        insert_deletion_headers(&mut headers, self.delete_after, self.delete_at.as_ref());
        let headers = custom_headers_to_map(&headers)?;

        let service = &self.client.service;
        let url = service
            .bind(
                "{container}/{object}",
                &[("container", self.container), ("object", self.object)],
            )
            .await?;
        let req = service.request(Method::PUT, url).await?.headers(headers);

        let req = attach_body(req, body, true).await?;
        let resp = service.send(req).await?;
        Ok(ObjectMetadata::from_headers(resp.headers()))
    }
}
// endregion: --- create object

// region:    --- copy object
/// COPY `{container}/{object}` to `Destination: /{destination_container}/{destination_object}`
#[derive(Builder)]
pub struct CopyObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_headers: HashMap<String, String>,

    source_container: &'a str,
    source_object: &'a str,
    destination_container: &'a str,
    destination_object: &'a str,
    /// seconds
    delete_after: Option<u64>,
    delete_at: Option<OffsetDateTime>,
}

impl<S: copy_object_builder::State> StorageMetaExt for CopyObjectBuilder<'_, S> {
    const PREFIX: &'static str = ObjectScope::PREFIX;

    fn custom_headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_headers
    }
}

impl CopyObject<'_> {
    pub async fn send(&self) -> Result<ObjectMetadata, Error> {
        validate_container_name(self.source_container)?;
        validate_object_name(self.source_object)?;
        validate_container_name(self.destination_container)?;
        validate_object_name(self.destination_object)?;

        let mut headers = self.custom_headers.clone();
        headers.insert(
            "destination".to_owned(),
            format!(
                "/{}/{}",
                utf8_percent_encode(self.destination_container, OBJECT_PATH),
                utf8_percent_encode(self.destination_object, OBJECT_PATH)
            ),
        );
        insert_deletion_headers(&mut headers, self.delete_after, self.delete_at.as_ref());
        let headers = custom_headers_to_map(&headers)?;

        let method = Method::from_bytes(b"COPY")
            .map_err(|e| Error::Common(format!("invalid method: {e}")))?;
        let service = &self.client.service;
        let url = service
            .bind(
                "{container}/{object}",
                &[
                    ("container", self.source_container),
                    ("object", self.source_object),
                ],
            )
            .await?;
        let req = service.request(method, url).await?;
        let resp = service.send(req.headers(headers)).await?;
        Ok(ObjectMetadata::from_headers(resp.headers()))
    }
}
// endregion: --- copy object

// region:    --- get object
#[derive(Builder)]
pub struct GetObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    object: &'a str,
    range: Option<ByteRange>,
    #[builder(default)]
    newest: bool,
}

impl GetObject<'_> {
    pub async fn receive_bytes(&self) -> Result<(Bytes, ObjectMetadata), Error> {
        let resp = self.get_response().await?;
        let metadata = ObjectMetadata::from_headers(resp.headers());
        let data = resp.bytes().await?;
        Ok((data, metadata))
    }

    pub async fn receive_bytes_stream(
        &self,
    ) -> Result<
        (
            impl Stream<Item = Result<Bytes, Error>> + use<>,
            ObjectMetadata,
        ),
        Error,
    > {
        let resp = self.get_response().await?;
        let metadata = ObjectMetadata::from_headers(resp.headers());
        let byte_stream = resp.bytes_stream().map(|item| item.map_err(Error::Reqwest));
        Ok((byte_stream, metadata))
    }

    pub async fn download_to_file(&self, file_path: &Path) -> Result<ObjectMetadata, Error> {
        let mut resp = self.get_response().await?;
        let metadata = ObjectMetadata::from_headers(resp.headers());

        let mut file = tokio::fs::File::create(file_path).await?;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(metadata)
    }

    async fn get_response(&self) -> Result<reqwest::Response, Error> {
        validate_container_name(self.container)?;
        validate_object_name(self.object)?;

        let service = &self.client.service;
        let url = service
            .bind(
                "{container}/{object}",
                &[("container", self.container), ("object", self.object)],
            )
            .await?;
        let mut req = with_newest(service.request(Method::GET, url).await?, self.newest);
        if let Some(range) = self.range {
            req = req.header(RANGE, range.to_header_value());
        }
        service.send(req).await
    }
}
// endregion: --- get object

// region:    --- object metadata
/// HEAD `{container}/{object}`
#[derive(Builder)]
pub struct GetObjectMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    object: &'a str,
    #[builder(default)]
    newest: bool,
}

impl GetObjectMetadata<'_> {
    pub async fn send(&self) -> Result<ObjectMetadata, Error> {
        validate_container_name(self.container)?;
        validate_object_name(self.object)?;
        let url = self
            .client
            .service
            .bind(
                "{container}/{object}",
                &[("container", self.container), ("object", self.object)],
            )
            .await?;
        self.client.head_metadata(url, self.newest).await
    }
}

/// POST `{container}/{object}`
///
/// Replaces all user metadata of the object with `metadata`. Read-only
/// headers and entries with an empty value are not sent, so an empty value
/// removes the key.
#[derive(Builder)]
pub struct SetObjectMetadata<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    object: &'a str,
    metadata: &'a ObjectMetadata,
    /// seconds
    delete_after: Option<u64>,
    delete_at: Option<OffsetDateTime>,
}

impl SetObjectMetadata<'_> {
    pub async fn send(&self) -> Result<(), Error> {
        validate_container_name(self.container)?;
        validate_object_name(self.object)?;

        let mut headers: HashMap<String, String> = self
            .metadata
            .to_request_headers()
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .filter(|(k, v)| !v.is_empty() && !READ_ONLY_HEADERS.contains(&k.as_str()))
            .collect();
        insert_deletion_headers(&mut headers, self.delete_after, self.delete_at.as_ref());
        let headers = custom_headers_to_map(&headers)?;

        let url = self
            .client
            .service
            .bind(
                "{container}/{object}",
                &[("container", self.container), ("object", self.object)],
            )
            .await?;
        self.client.post_headers(url, headers).await
    }
}
// endregion: --- object metadata

impl Client {
    pub fn create_object(&self) -> CreateObjectBuilder<'_> {
        CreateObject::builder(self)
    }

    pub fn copy_object(&self) -> CopyObjectBuilder<'_> {
        CopyObject::builder(self)
    }

    pub fn get_object(&self) -> GetObjectBuilder<'_> {
        GetObject::builder(self)
    }

    pub fn get_object_metadata(&self) -> GetObjectMetadataBuilder<'_> {
        GetObjectMetadata::builder(self)
    }

    pub fn set_object_metadata(&self) -> SetObjectMetadataBuilder<'_> {
        SetObjectMetadata::builder(self)
    }

    pub async fn remove_object(&self, container: &str, object: &str) -> Result<(), Error> {
        validate_container_name(container)?;
        validate_object_name(object)?;
        let url = self
            .service
            .bind(
                "{container}/{object}",
                &[("container", container), ("object", object)],
            )
            .await?;
        let req = self.service.request(Method::DELETE, url).await?;
        self.service.send(req).await?;
        Ok(())
    }

    /// Server-side copy followed by removal of the source.
    ///
    /// Not atomic: if the removal fails the object exists in both places.
    pub async fn move_object(
        &self,
        source_container: &str,
        source_object: &str,
        destination_container: &str,
        destination_object: &str,
    ) -> Result<(), Error> {
        self.copy_object()
            .source_container(source_container)
            .source_object(source_object)
            .destination_container(destination_container)
            .destination_object(destination_object)
            .build()
            .send()
            .await?;
        self.remove_object(source_container, source_object).await
    }

    /// Reads the current metadata, overlays `updates` and writes the result back.
    pub async fn update_object_metadata(
        &self,
        container: &str,
        object: &str,
        updates: &ObjectMetadata,
    ) -> Result<(), Error> {
        let mut metadata = self
            .get_object_metadata()
            .container(container)
            .object(object)
            .build()
            .send()
            .await?;
        metadata.merge(updates);
        self.set_object_metadata()
            .container(container)
            .object(object)
            .metadata(&metadata)
            .build()
            .send()
            .await
    }

    pub async fn remove_object_metadata(
        &self,
        container: &str,
        object: &str,
        keys: &[&str],
    ) -> Result<(), Error> {
        if keys.iter().any(|k| k.is_empty()) {
            return Err(Error::Common("metadata key cannot be empty".to_owned()));
        }
        let mut updates = ObjectMetadata::default();
        for key in keys {
            updates.metadata_mut().insert(*key, "");
        }
        self.update_object_metadata(container, object, &updates)
            .await
    }
}
