//! Static website hosting, available when `/info` lists `staticweb`.
//!
//! A container serves `Web-Index` for directory requests, `{code}{Web-Error}`
//! for errors, and, with `Web-Listings` on, generated listings styled by
//! `Web-Listings-CSS`. The container also needs a public read ACL.

use super::metadata::{ContainerMetadata, ContainerScope, MetadataScope, StorageMetaExt};
use super::utils::{custom_headers_to_map, validate_container_name};
use super::Client;
use crate::Error;
use std::collections::HashMap;

const WEB_INDEX: &str = "Web-Index";
const WEB_ERROR: &str = "Web-Error";
const WEB_LISTINGS: &str = "Web-Listings";
const WEB_LISTINGS_CSS: &str = "Web-Listings-CSS";

impl ContainerMetadata {
    pub fn web_index(&self) -> Option<&str> {
        self.meta(WEB_INDEX).filter(|v| !v.is_empty())
    }

    pub fn web_error(&self) -> Option<&str> {
        self.meta(WEB_ERROR).filter(|v| !v.is_empty())
    }

    pub fn web_listings_enabled(&self) -> bool {
        self.meta(WEB_LISTINGS)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn web_listings_css(&self) -> Option<&str> {
        self.meta(WEB_LISTINGS_CSS).filter(|v| !v.is_empty())
    }
}

fn website_metas<'a>(
    index: Option<&'a str>,
    error: Option<&'a str>,
    listings_css: Option<Option<&'a str>>,
) -> Vec<(&'static str, &'a str)> {
    let mut metas = Vec::new();
    if let Some(index) = index {
        metas.push((WEB_INDEX, index));
    }
    if let Some(error) = error {
        metas.push((WEB_ERROR, error));
    }
    match listings_css {
        Some(Some(css)) => {
            metas.push((WEB_LISTINGS, "TRUE"));
            metas.push((WEB_LISTINGS_CSS, css));
        }
        Some(None) => {
            metas.push((WEB_LISTINGS, ""));
            metas.push((WEB_LISTINGS_CSS, ""));
        }
        None => {}
    }
    metas
}

impl Client {
    pub async fn supports_static_website(&self) -> Result<bool, Error> {
        Ok(self.get_info().await?.supports_static_website())
    }

    /// Creates a container that serves `index` and `error` pages. With
    /// `listings_css` set, directory listings are turned on as well.
    pub async fn create_static_website_container(
        &self,
        container: &str,
        index: &str,
        error: &str,
        listings_css: Option<&str>,
    ) -> Result<(), Error> {
        let metas = website_metas(Some(index), Some(error), listings_css.map(Some));
        self.create_container()
            .metas(metas)
            .container(container)
            .build()
            .send()
            .await
    }

    /// Configures an existing container. Without `listings_css`, listings are
    /// turned off and any stylesheet is cleared.
    pub async fn set_static_website(
        &self,
        container: &str,
        index: &str,
        error: &str,
        listings_css: Option<&str>,
    ) -> Result<(), Error> {
        let metas = website_metas(Some(index), Some(error), Some(listings_css));
        self.update_container_metadata()
            .metas(metas)
            .container(container)
            .build()
            .send()
            .await
    }

    pub async fn set_static_website_index(&self, container: &str, index: &str) -> Result<(), Error> {
        self.set_website_metas(container, website_metas(Some(index), None, None))
            .await
    }

    pub async fn remove_static_website_index(&self, container: &str) -> Result<(), Error> {
        self.set_website_metas(container, vec![(WEB_INDEX, "")])
            .await
    }

    pub async fn set_static_website_error(&self, container: &str, error: &str) -> Result<(), Error> {
        self.set_website_metas(container, website_metas(None, Some(error), None))
            .await
    }

    pub async fn remove_static_website_error(&self, container: &str) -> Result<(), Error> {
        self.set_website_metas(container, vec![(WEB_ERROR, "")])
            .await
    }

    /// Turns listings on, styled by `css`.
    pub async fn set_static_website_listings_css(
        &self,
        container: &str,
        css: &str,
    ) -> Result<(), Error> {
        self.set_website_metas(container, website_metas(None, None, Some(Some(css))))
            .await
    }

    /// Turns listings off and clears the stylesheet.
    pub async fn remove_static_website_listings_css(&self, container: &str) -> Result<(), Error> {
        self.set_website_metas(container, website_metas(None, None, Some(None)))
            .await
    }

    async fn set_website_metas(
        &self,
        container: &str,
        metas: Vec<(&str, &str)>,
    ) -> Result<(), Error> {
        validate_container_name(container)?;
        let headers: HashMap<String, String> = metas
            .into_iter()
            .map(|(k, v)| {
                (
                    format!("{}{k}", ContainerScope::PREFIX).to_ascii_lowercase(),
                    v.to_owned(),
                )
            })
            .collect();
        let url = self
            .service
            .bind("{container}", &[("container", container)])
            .await?;
        self.post_headers(url, custom_headers_to_map(&headers)?)
            .await
    }
}
