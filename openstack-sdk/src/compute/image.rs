use super::types_rs::{Image, ImageEnvelope};
use super::{Client, as_str_params, paging_params};
use crate::Error;
use crate::page::Page;
use crate::service::json;
use bon::Builder;
use reqwest::Method;
use time::OffsetDateTime;

/// GET `images/detail`
#[derive(Builder)]
pub struct ListImages<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    limit: Option<u32>,
    marker: Option<&'a str>,
    changes_since: Option<OffsetDateTime>,
}

impl ListImages<'_> {
    pub async fn send(&self) -> Result<Page<Image>, Error> {
        let params = paging_params(self.limit, self.marker, self.changes_since.as_ref())?;
        let url = self
            .client
            .service
            .bind(
                "images/detail{?limit,marker,changes-since}",
                &as_str_params(&params),
            )
            .await?;
        self.client.fetch_page(url).await
    }
}

impl Client {
    pub fn list_images(&self) -> ListImagesBuilder<'_> {
        ListImages::builder(self)
    }

    pub async fn get_image(&self, image_id: &str) -> Result<Image, Error> {
        let url = self
            .service
            .bind("images/{image_id}", &[("image_id", image_id)])
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: ImageEnvelope = json(resp).await?;
        Ok(envelope.image)
    }

    pub async fn remove_image(&self, image_id: &str) -> Result<(), Error> {
        let url = self
            .service
            .bind("images/{image_id}", &[("image_id", image_id)])
            .await?;
        let req = self.service.request(Method::DELETE, url).await?;
        self.service.send(req).await?;
        Ok(())
    }
}
