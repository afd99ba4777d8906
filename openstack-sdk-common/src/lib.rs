//! Helpers shared by the `openstack-sdk` service clients: URI templates,
//! response decoding and small header/query utilities.

mod error;
pub mod helper;
pub mod uri_template;

pub use error::Error;
pub use uri_template::UriTemplate;
