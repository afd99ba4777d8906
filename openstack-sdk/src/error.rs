use crate::auth::AuthError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error: {0}")]
    Common(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("response status is not success: {status}, text: {text}")]
    RequestAPIFailed {
        status: reqwest::StatusCode,
        text: String,
    },
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<openstack_sdk_common::Error> for Error {
    fn from(value: openstack_sdk_common::Error) -> Self {
        use openstack_sdk_common::Error as E;
        match value {
            E::Common(s) => Error::Common(s),
            E::RequestAPIFailed { status, body } => Error::RequestAPIFailed { status, text: body },
            E::Reqwest(e) => Error::Reqwest(e),
            E::Json(e) => Error::Json(e),
        }
    }
}

impl Error {
    /// HTTP status of a failed API call, if this error carries one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::RequestAPIFailed { status, .. } => Some(*status),
            Error::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}
