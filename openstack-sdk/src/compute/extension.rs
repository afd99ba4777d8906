use super::Client;
use super::types_rs::{Extension, ExtensionEnvelope, ExtensionsEnvelope};
use crate::Error;
use crate::service::json;
use reqwest::Method;

impl Client {
    /// Lists the API extensions the endpoint supports. Not paginated.
    pub async fn list_extensions(&self) -> Result<Vec<Extension>, Error> {
        let url = self.service.bind("extensions", &[]).await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: ExtensionsEnvelope = json(resp).await?;
        Ok(envelope.extensions)
    }

    pub async fn get_extension(&self, alias: &str) -> Result<Extension, Error> {
        let url = self
            .service
            .bind("extensions/{alias}", &[("alias", alias)])
            .await?;
        let req = self.service.request(Method::GET, url).await?;
        let resp = self.service.send(req).await?;
        let envelope: ExtensionEnvelope = json(resp).await?;
        Ok(envelope.extension)
    }

    /// Checks the extension list for `alias`, ignoring case.
    pub async fn supports_extension(&self, alias: &str) -> Result<bool, Error> {
        let extensions = self.list_extensions().await?;
        Ok(extensions
            .iter()
            .any(|e| e.alias.eq_ignore_ascii_case(alias)))
    }
}
