use crate::Error;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha1::Sha1;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// Format: YYYY-MM-DDThh:mm:ssZ
///
/// Used for the `changes-since` filter of compute listings.
pub fn format_rfc3339(date_time: &OffsetDateTime) -> Result<String, Error> {
    date_time
        .format(&Rfc3339)
        .map_err(|e| Error::Common(format!("format datetime error: {e}")))
}

/// Builds a header map from `(name, value)` pairs.
///
/// Values are sent as their raw UTF-8 bytes, so non-ASCII metadata survives the trip.
pub fn try_into_header_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<HeaderMap, Error>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = HeaderMap::new();
    for (k, v) in pairs {
        let name = HeaderName::from_bytes(k.as_ref().as_bytes())
            .map_err(|e| Error::Common(format!("invalid header name `{}`: {e}", k.as_ref())))?;
        let value = HeaderValue::from_bytes(v.as_ref().as_bytes())
            .map_err(|e| Error::Common(format!("invalid header value for `{}`: {e}", k.as_ref())))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Decodes a header value as UTF-8, replacing invalid sequences.
pub fn header_value_to_string(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// Sets `name=value` on the query string, dropping any earlier values of `name`.
pub fn set_query_parameter(url: &mut Url, name: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    let mut pairs = url.query_pairs_mut();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(name, value);
}

pub fn sign_hmac_sha1(secret: &str, str_to_sign: &str) -> Result<Vec<u8>, Error> {
    type HmacSha1 = Hmac<Sha1>;
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Common(format!("hmac key error: {e}")))?;
    mac.update(str_to_sign.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Turns a non-success response into [`Error::RequestAPIFailed`], keeping the body
/// since OpenStack services explain the failure there.
pub async fn failed_response_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    match resp.text().await {
        Ok(body) => Error::RequestAPIFailed { status, body },
        Err(e) => Error::Reqwest(e),
    }
}

/// Decodes the body of a successful response as JSON.
pub async fn parse_json_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    if !resp.status().is_success() {
        return Err(failed_response_error(resp).await);
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
