use crate::MetadataMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Declares a string enumeration that keeps values it does not recognize.
macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value this crate does not know about.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.to_ascii_uppercase().as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(value),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(s) => s,
                    other => other.as_str().to_owned(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    ServerStatus {
        Active => "ACTIVE",
        Build => "BUILD",
        Deleted => "DELETED",
        Error => "ERROR",
        HardReboot => "HARD_REBOOT",
        Migrating => "MIGRATING",
        Password => "PASSWORD",
        Reboot => "REBOOT",
        Rebuild => "REBUILD",
        Resize => "RESIZE",
        RevertResize => "REVERT_RESIZE",
        Suspended => "SUSPENDED",
        Unknown => "UNKNOWN",
        VerifyResize => "VERIFY_RESIZE",
    }
);

open_enum!(
    ImageStatus {
        Active => "ACTIVE",
        Saving => "SAVING",
        Deleted => "DELETED",
        Error => "ERROR",
        Unknown => "UNKNOWN",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RebootType {
    Soft,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// `{"id": ..., "links": [...]}` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<ServerStatus>,
    pub progress: Option<u32>,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(rename = "hostId")]
    pub host_id: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub flavor: Option<ResourceRef>,
    /// An object, or an empty string for servers booted from a volume.
    pub image: Option<Value>,
    #[serde(rename = "accessIPv4")]
    pub access_ipv4: Option<String>,
    #[serde(rename = "accessIPv6")]
    pub access_ipv6: Option<String>,
    pub addresses: Option<BTreeMap<String, Vec<AddressDetails>>>,
    pub metadata: Option<MetadataMap>,
    /// Only returned when the server is created or rebuilt.
    #[serde(rename = "adminPass")]
    pub admin_pass: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extension_data: Map<String, Value>,
}

impl Server {
    pub fn image_id(&self) -> Option<&str> {
        self.image.as_ref()?.get("id")?.as_str()
    }

    pub fn flavor_id(&self) -> Option<&str> {
        self.flavor.as_ref().map(|f| f.id.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: Option<String>,
    /// GB
    pub disk: Option<u64>,
    /// MB
    pub ram: Option<u64>,
    pub vcpus: Option<u32>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extension_data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<ImageStatus>,
    pub progress: Option<u32>,
    #[serde(rename = "minDisk")]
    pub min_disk: Option<u64>,
    #[serde(rename = "minRam")]
    pub min_ram: Option<u64>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub metadata: Option<MetadataMap>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extension_data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extension {
    pub alias: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub namespace: Option<String>,
    pub updated: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub version: u8,
    pub addr: String,
    #[serde(flatten)]
    pub extension_data: Map<String, Value>,
}

impl AddressDetails {
    pub fn ip(&self) -> Option<IpAddr> {
        self.addr.parse().ok()
    }
}

/// Addresses of a server grouped by network label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerAddresses(pub BTreeMap<String, Vec<AddressDetails>>);

impl ServerAddresses {
    pub fn network(&self, label: &str) -> &[AddressDetails] {
        self.0.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn public(&self) -> &[AddressDetails] {
        self.network("public")
    }

    pub fn private(&self) -> &[AddressDetails] {
        self.network("private")
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// region:    --- envelopes
#[derive(Deserialize)]
pub(crate) struct ServerEnvelope {
    pub(crate) server: Server,
}

#[derive(Deserialize)]
pub(crate) struct FlavorEnvelope {
    pub(crate) flavor: Flavor,
}

#[derive(Deserialize)]
pub(crate) struct ImageEnvelope {
    pub(crate) image: Image,
}

#[derive(Deserialize)]
pub(crate) struct ExtensionEnvelope {
    pub(crate) extension: Extension,
}

#[derive(Deserialize)]
pub(crate) struct ExtensionsEnvelope {
    #[serde(default)]
    pub(crate) extensions: Vec<Extension>,
}

#[derive(Deserialize)]
pub(crate) struct AddressesEnvelope {
    #[serde(default)]
    pub(crate) addresses: ServerAddresses,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct MetadataEnvelope {
    #[serde(default)]
    pub(crate) metadata: MetadataMap,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct MetaItemEnvelope {
    #[serde(alias = "metadata")]
    pub(crate) meta: MetadataMap,
}
// endregion: --- envelopes
