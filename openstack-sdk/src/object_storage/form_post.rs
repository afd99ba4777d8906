//! Browser uploads through the `formpost` middleware.
//!
//! The server side shares a secret key (`X-Account-Meta-Temp-URL-Key` or
//! `X-Container-Meta-Temp-URL-Key`) with the application. The application
//! signs the form fields and hands the URI and fields to a browser, which then
//! POSTs files straight to the cluster.

use super::utils::validate_container_name;
use super::Client;
use crate::Error;
use bon::Builder;
use openstack_sdk_common::helper::sign_hmac_sha1;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use url::Url;

/// Where to POST and which hidden fields the form must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPostUri {
    pub uri: Url,
    /// `redirect`, `max_file_size`, `max_file_count`, `expires`, `signature`
    pub fields: BTreeMap<String, String>,
}

#[derive(Builder)]
pub struct CreateFormPostUri<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    container: &'a str,
    /// Uploaded file names are prefixed with this.
    #[builder(default)]
    object_prefix: &'a str,
    key: &'a str,
    expires: OffsetDateTime,
    /// Where the browser is sent after the upload.
    redirect: Option<&'a str>,
    /// bytes, per file
    max_file_size: u64,
    max_file_count: u32,
}

impl CreateFormPostUri<'_> {
    pub async fn generate(&self) -> Result<FormPostUri, Error> {
        validate_container_name(self.container)?;
        if self.max_file_count == 0 {
            return Err(Error::Common("max_file_count must be at least 1".to_owned()));
        }

        let uri = self
            .client
            .service
            .bind(
                "{container}/{+object_prefix}",
                &[
                    ("container", self.container),
                    ("object_prefix", self.object_prefix),
                ],
            )
            .await?;

        let path = percent_decode_str(uri.path()).decode_utf8_lossy();
        let redirect = self.redirect.unwrap_or_default();
        let expires = self.expires.unix_timestamp().to_string();
        let string_to_sign = format_string_to_sign(
            &path,
            redirect,
            self.max_file_size,
            self.max_file_count,
            &expires,
        );
        let signature = hex::encode(sign_hmac_sha1(self.key, &string_to_sign)?);

        let fields = BTreeMap::from([
            ("redirect".to_owned(), redirect.to_owned()),
            ("max_file_size".to_owned(), self.max_file_size.to_string()),
            ("max_file_count".to_owned(), self.max_file_count.to_string()),
            ("expires".to_owned(), expires),
            ("signature".to_owned(), signature),
        ]);

        Ok(FormPostUri { uri, fields })
    }
}

fn format_string_to_sign(
    path: &str,
    redirect: &str,
    max_file_size: u64,
    max_file_count: u32,
    expires: &str,
) -> String {
    format!("{path}\n{redirect}\n{max_file_size}\n{max_file_count}\n{expires}")
}

impl Client {
    pub fn create_form_post_uri(&self) -> CreateFormPostUriBuilder<'_> {
        CreateFormPostUri::builder(self)
    }

    pub async fn supports_form_post(&self) -> Result<bool, Error> {
        Ok(self.get_info().await?.supports_form_post())
    }
}
