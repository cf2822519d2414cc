//! Response and payload descriptors.
//!
//! A descriptor names an abstract content type, its version and its wire
//! [`Format`]. It drives content negotiation (vendor mimetypes) and selects
//! the codec used for bodies.

use serde::{Deserialize, Serialize};

use crate::Format;

/// Vendor segment of negotiated mimetypes when none is configured.
pub const DEFAULT_VENDOR: &str = "hyperion";

/// Describes an acceptable response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    #[serde(rename = "type")]
    type_name: String,
    version: u32,
    format: Format,
}

/// Describes the payload sent with a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadDescriptor {
    #[serde(rename = "type")]
    type_name: String,
    version: u32,
    format: Format,
}

macro_rules! descriptor_impl {
    ($name:ident) => {
        impl $name {
            /// Creates a new descriptor.
            #[must_use]
            pub fn new(type_name: impl Into<String>, version: u32, format: Format) -> Self {
                Self {
                    type_name: type_name.into(),
                    version,
                    format,
                }
            }

            /// Abstract content type name.
            #[must_use]
            pub fn type_name(&self) -> &str {
                &self.type_name
            }

            /// Content type version.
            #[must_use]
            pub const fn version(&self) -> u32 {
                self.version
            }

            /// Wire format.
            #[must_use]
            pub const fn format(&self) -> Format {
                self.format
            }

            /// Full vendor mimetype, e.g. `application/vnd.acme.user-v1+json`.
            #[must_use]
            pub fn mimetype(&self, vendor: &str) -> String {
                format!("application/vnd.{vendor}.{self}")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-v{}+{}", self.type_name, self.version, self.format)
            }
        }
    };
}

descriptor_impl!(ResponseDescriptor);
descriptor_impl!(PayloadDescriptor);
