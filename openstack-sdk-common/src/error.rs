use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Common(String),
    /// The service answered with a non-success status.
    #[error("openstack api returned {status}: {body}")]
    RequestAPIFailed { status: StatusCode, body: String },
    #[error("http transport error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("malformed json body: {0}")]
    Json(#[from] serde_json::Error),
}
