use super::types_rs::{
    AddressesEnvelope, RebootType, Server, ServerAddresses, ServerEnvelope,
};
use super::{Client, ComputeMetaExt, ExtensionDataExt, as_str_params, paging_params};
use crate::Error;
use crate::page::Page;
use crate::service::{json, with_json_body};
use bon::Builder;
use reqwest::Method;
use reqwest::header::LOCATION;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use time::OffsetDateTime;
use url::Url;

// region:    --- list servers
#[derive(Builder)]
pub struct ListServers<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    /// page size
    limit: Option<u32>,
    /// id of the last server of the previous page
    marker: Option<&'a str>,
    /// only servers changed since this time, deleted ones included
    changes_since: Option<OffsetDateTime>,
}

impl ListServers<'_> {
    pub async fn send(&self) -> Result<Page<Server>, Error> {
        let params = paging_params(self.limit, self.marker, self.changes_since.as_ref())?;
        let url = self
            .client
            .service
            .bind("servers{?limit,marker,changes-since}", &as_str_params(&params))
            .await?;
        self.client.fetch_page(url).await
    }
}
// endregion: --- list servers

// region:    --- create server
#[serde_with::skip_serializing_none]
#[derive(Builder, Serialize)]
pub struct CreateServer<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub(crate) metadata: HashMap<String, String>,
    #[builder(field)]
    #[serde(flatten)]
    pub(crate) extension_data: Map<String, Value>,

    name: &'a str,
    #[serde(rename = "imageRef")]
    image_ref: &'a str,
    #[serde(rename = "flavorRef")]
    flavor_ref: &'a str,
    #[serde(rename = "adminPass")]
    admin_pass: Option<&'a str>,
    #[serde(rename = "accessIPv4")]
    access_ipv4: Option<&'a str>,
    #[serde(rename = "accessIPv6")]
    access_ipv6: Option<&'a str>,
}

impl<S: create_server_builder::State> ComputeMetaExt for CreateServerBuilder<'_, S> {
    fn metadata_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.metadata
    }
}

impl<S: create_server_builder::State> ExtensionDataExt for CreateServerBuilder<'_, S> {
    fn extension_data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extension_data
    }
}

impl CreateServer<'_> {
    /// The returned server usually carries only `id`, `links` and `adminPass`;
    /// poll [`Client::get_server`] for the rest.
    pub async fn send(&self) -> Result<Server, Error> {
        let service = &self.client.service;
        let url = service.bind("servers", &[]).await?;
        let req = service.request(Method::POST, url).await?;
        let req = with_json_body(req, &BTreeMap::from([("server", self)]))?;
        let resp = service.send(req).await?;
        let envelope: ServerEnvelope = json(resp).await?;
        Ok(envelope.server)
    }
}
// endregion: --- create server

// region:    --- update server
#[serde_with::skip_serializing_none]
#[derive(Builder, Serialize)]
pub struct UpdateServer<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    #[serde(flatten)]
    pub(crate) extension_data: Map<String, Value>,

    #[serde(skip_serializing)]
    server_id: &'a str,
    name: Option<&'a str>,
    #[serde(rename = "accessIPv4")]
    access_ipv4: Option<&'a str>,
    #[serde(rename = "accessIPv6")]
    access_ipv6: Option<&'a str>,
}

impl<S: update_server_builder::State> ExtensionDataExt for UpdateServerBuilder<'_, S> {
    fn extension_data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extension_data
    }
}

impl UpdateServer<'_> {
    pub async fn send(&self) -> Result<Server, Error> {
        let service = &self.client.service;
        let url = service
            .bind("servers/{server_id}", &[("server_id", self.server_id)])
            .await?;
        let req = service.request(Method::PUT, url).await?;
        let req = with_json_body(req, &BTreeMap::from([("server", self)]))?;
        let resp = service.send(req).await?;
        let envelope: ServerEnvelope = json(resp).await?;
        Ok(envelope.server)
    }
}
// endregion: --- update server

// region:    --- rebuild server
#[serde_with::skip_serializing_none]
#[derive(Builder, Serialize)]
pub struct RebuildServer<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub(crate) metadata: HashMap<String, String>,
    #[builder(field)]
    #[serde(flatten)]
    pub(crate) extension_data: Map<String, Value>,

    #[serde(skip_serializing)]
    server_id: &'a str,
    #[serde(rename = "imageRef")]
    image_ref: &'a str,
    name: Option<&'a str>,
    #[serde(rename = "adminPass")]
    admin_pass: Option<&'a str>,
    #[serde(rename = "accessIPv4")]
    access_ipv4: Option<&'a str>,
    #[serde(rename = "accessIPv6")]
    access_ipv6: Option<&'a str>,
}

impl<S: rebuild_server_builder::State> ComputeMetaExt for RebuildServerBuilder<'_, S> {
    fn metadata_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.metadata
    }
}

impl<S: rebuild_server_builder::State> ExtensionDataExt for RebuildServerBuilder<'_, S> {
    fn extension_data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extension_data
    }
}

impl RebuildServer<'_> {
    pub async fn send(&self) -> Result<Server, Error> {
        let resp = self
            .client
            .server_action(self.server_id, &BTreeMap::from([("rebuild", self)]))
            .await?;
        let envelope: ServerEnvelope = json(resp).await?;
        Ok(envelope.server)
    }
}
// endregion: --- rebuild server

// region:    --- create image
#[derive(Builder)]
pub struct CreateImage<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) metadata: HashMap<String, String>,

    server_id: &'a str,
    name: &'a str,
}

impl<S: create_image_builder::State> ComputeMetaExt for CreateImageBuilder<'_, S> {
    fn metadata_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.metadata
    }
}

impl CreateImage<'_> {
    /// Returns the URI of the new image, taken from the `Location` header.
    pub async fn send(&self) -> Result<Url, Error> {
        let body = json!({
            "createImage": {
                "name": self.name,
                "metadata": self.metadata,
            }
        });
        let resp = self.client.server_action(self.server_id, &body).await?;

        let location = resp
            .headers()
            .get(LOCATION)
            .ok_or_else(|| Error::Common("createImage response has no Location header".into()))?
            .to_str()
            .map_err(|e| Error::Common(format!("invalid Location header: {e}")))?;
        resp.url()
            .join(location)
            .map_err(|e| Error::Common(format!("invalid Location header `{location}`: {e}")))
    }
}
// endregion: --- create image

impl Client {
    pub fn list_servers(&self) -> ListServersBuilder<'_> {
        ListServers::builder(self)
    }

    pub fn create_server(&self) -> CreateServerBuilder<'_> {
        CreateServer::builder(self)
    }

    pub fn update_server(&self) -> UpdateServerBuilder<'_> {
        UpdateServer::builder(self)
    }

    pub fn rebuild_server(&self) -> RebuildServerBuilder<'_> {
        RebuildServer::builder(self)
    }

    pub fn create_image(&self) -> CreateImageBuilder<'_> {
        CreateImage::builder(self)
    }

    pub async fn get_server(&self, server_id: &str) -> Result<Server, Error> {
        let url = self
            .service
            .bind("servers/{server_id}", &[("server_id", server_id)])
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: ServerEnvelope = json(resp).await?;
        Ok(envelope.server)
    }

    pub async fn remove_server(&self, server_id: &str) -> Result<(), Error> {
        let url = self
            .service
            .bind("servers/{server_id}", &[("server_id", server_id)])
            .await?;
        let req = self.service.request(Method::DELETE, url).await?;
        self.service.send(req).await?;
        Ok(())
    }

    pub async fn list_addresses(&self, server_id: &str) -> Result<ServerAddresses, Error> {
        let url = self
            .service
            .bind("servers/{server_id}/ips", &[("server_id", server_id)])
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: AddressesEnvelope = json(resp).await?;
        Ok(envelope.addresses)
    }

    pub async fn change_password(&self, server_id: &str, admin_pass: &str) -> Result<(), Error> {
        let body = json!({ "changePassword": { "adminPass": admin_pass } });
        self.server_action(server_id, &body).await?;
        Ok(())
    }

    pub async fn reboot_server(&self, server_id: &str, reboot_type: RebootType) -> Result<(), Error> {
        let body = json!({ "reboot": { "type": reboot_type } });
        self.server_action(server_id, &body).await?;
        Ok(())
    }

    /// The server moves to `VERIFY_RESIZE`; finish with [`Client::confirm_resize`]
    /// or roll back with [`Client::revert_resize`].
    pub async fn resize_server(&self, server_id: &str, flavor_ref: &str) -> Result<(), Error> {
        let body = json!({ "resize": { "flavorRef": flavor_ref } });
        self.server_action(server_id, &body).await?;
        Ok(())
    }

    pub async fn confirm_resize(&self, server_id: &str) -> Result<(), Error> {
        self.server_action(server_id, &json!({ "confirmResize": null }))
            .await?;
        Ok(())
    }

    pub async fn revert_resize(&self, server_id: &str) -> Result<(), Error> {
        self.server_action(server_id, &json!({ "revertResize": null }))
            .await?;
        Ok(())
    }
}
