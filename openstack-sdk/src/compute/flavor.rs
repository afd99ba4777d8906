use super::types_rs::{Flavor, FlavorEnvelope};
use super::{Client, as_str_params, paging_params};
use crate::Error;
use crate::page::Page;
use crate::service::json;
use bon::Builder;
use reqwest::Method;
use time::OffsetDateTime;

/// GET `flavors/detail`
#[derive(Builder)]
pub struct ListFlavors<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    /// GB
    min_disk: Option<u64>,
    /// MB
    min_ram: Option<u64>,
    limit: Option<u32>,
    marker: Option<&'a str>,
    changes_since: Option<OffsetDateTime>,
}

impl ListFlavors<'_> {
    pub async fn send(&self) -> Result<Page<Flavor>, Error> {
        let mut params = paging_params(self.limit, self.marker, self.changes_since.as_ref())?;
        if let Some(v) = self.min_disk {
            params.push(("minDisk", v.to_string()));
        }
        if let Some(v) = self.min_ram {
            params.push(("minRam", v.to_string()));
        }
        let url = self
            .client
            .service
            .bind(
                "flavors/detail{?minDisk,minRam,limit,marker,changes-since}",
                &as_str_params(&params),
            )
            .await?;
        self.client.fetch_page(url).await
    }
}

impl Client {
    pub fn list_flavors(&self) -> ListFlavorsBuilder<'_> {
        ListFlavors::builder(self)
    }

    pub async fn get_flavor(&self, flavor_id: &str) -> Result<Flavor, Error> {
        let url = self
            .service
            .bind("flavors/{flavor_id}", &[("flavor_id", flavor_id)])
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: FlavorEnvelope = json(resp).await?;
        Ok(envelope.flavor)
    }
}
