//! Server and image metadata.
//!
//! Both resources expose the same sub-resource:
//!
//! - `GET/PUT {resource}/{id}/metadata` for the whole map
//! - `GET/PUT/DELETE {resource}/{id}/metadata/{key}` for one item

use super::Client;
use super::types_rs::{MetaItemEnvelope, MetadataEnvelope};
use crate::Error;
use crate::MetadataMap;
use crate::service::{json, with_json_body};
use reqwest::Method;

#[derive(Debug, Clone, Copy)]
enum Resource {
    Server,
    Image,
}

impl Resource {
    fn collection(self) -> &'static str {
        match self {
            Resource::Server => "servers",
            Resource::Image => "images",
        }
    }
}

impl Client {
    async fn get_metadata(&self, resource: Resource, id: &str) -> Result<MetadataMap, Error> {
        let url = self
            .service
            .bind(
                "{collection}/{id}/metadata",
                &[("collection", resource.collection()), ("id", id)],
            )
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: MetadataEnvelope = json(resp).await?;
        Ok(envelope.metadata)
    }

    /// Replaces the whole map.
    async fn set_metadata(
        &self,
        resource: Resource,
        id: &str,
        metadata: &MetadataMap,
    ) -> Result<MetadataMap, Error> {
        let url = self
            .service
            .bind(
                "{collection}/{id}/metadata",
                &[("collection", resource.collection()), ("id", id)],
            )
            .await?;
        let req = self.service.request(Method::PUT, url).await?;
        let body = MetadataEnvelope {
            metadata: metadata.clone(),
        };
        let req = with_json_body(req, &body)?;
        let resp = self.service.send(req).await?;
        let envelope: MetadataEnvelope = json(resp).await?;
        Ok(envelope.metadata)
    }

    async fn get_metadata_item(
        &self,
        resource: Resource,
        id: &str,
        key: &str,
    ) -> Result<Option<String>, Error> {
        let url = self
            .service
            .bind(
                "{collection}/{id}/metadata/{key}",
                &[("collection", resource.collection()), ("id", id), ("key", key)],
            )
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: MetaItemEnvelope = json(resp).await?;
        Ok(envelope.meta.get(key).map(str::to_owned))
    }

    async fn set_metadata_item(
        &self,
        resource: Resource,
        id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Error> {
        let url = self
            .service
            .bind(
                "{collection}/{id}/metadata/{key}",
                &[("collection", resource.collection()), ("id", id), ("key", key)],
            )
            .await?;
        let req = self.service.request(Method::PUT, url).await?;
        let body = MetaItemEnvelope {
            meta: [(key, value)].into_iter().collect(),
        };
        let req = with_json_body(req, &body)?;
        self.service.send(req).await?;
        Ok(())
    }

    async fn remove_metadata_item(
        &self,
        resource: Resource,
        id: &str,
        key: &str,
    ) -> Result<(), Error> {
        let url = self
            .service
            .bind(
                "{collection}/{id}/metadata/{key}",
                &[("collection", resource.collection()), ("id", id), ("key", key)],
            )
            .await?;
        let req = self.service.request(Method::DELETE, url).await?;
        self.service.send(req).await?;
        Ok(())
    }

    // region:    --- server metadata
    pub async fn get_server_metadata(&self, server_id: &str) -> Result<MetadataMap, Error> {
        self.get_metadata(Resource::Server, server_id).await
    }

    pub async fn set_server_metadata(
        &self,
        server_id: &str,
        metadata: &MetadataMap,
    ) -> Result<MetadataMap, Error> {
        self.set_metadata(Resource::Server, server_id, metadata).await
    }

    pub async fn get_server_metadata_item(
        &self,
        server_id: &str,
        key: &str,
    ) -> Result<Option<String>, Error> {
        self.get_metadata_item(Resource::Server, server_id, key).await
    }

    pub async fn set_server_metadata_item(
        &self,
        server_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Error> {
        self.set_metadata_item(Resource::Server, server_id, key, value)
            .await
    }

    pub async fn remove_server_metadata_item(&self, server_id: &str, key: &str) -> Result<(), Error> {
        self.remove_metadata_item(Resource::Server, server_id, key)
            .await
    }
    // endregion: --- server metadata

    // region:    --- image metadata
    pub async fn get_image_metadata(&self, image_id: &str) -> Result<MetadataMap, Error> {
        self.get_metadata(Resource::Image, image_id).await
    }

    pub async fn set_image_metadata(
        &self,
        image_id: &str,
        metadata: &MetadataMap,
    ) -> Result<MetadataMap, Error> {
        self.set_metadata(Resource::Image, image_id, metadata).await
    }

    pub async fn get_image_metadata_item(
        &self,
        image_id: &str,
        key: &str,
    ) -> Result<Option<String>, Error> {
        self.get_metadata_item(Resource::Image, image_id, key).await
    }

    pub async fn set_image_metadata_item(
        &self,
        image_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Error> {
        self.set_metadata_item(Resource::Image, image_id, key, value)
            .await
    }

    pub async fn remove_image_metadata_item(&self, image_id: &str, key: &str) -> Result<(), Error> {
        self.remove_metadata_item(Resource::Image, image_id, key)
            .await
    }
    // endregion: --- image metadata
}
