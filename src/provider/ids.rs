//! Newtypes for provider identifiers to avoid stringly-typed handles.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! ocid {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a provider identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrows the identifier as a string slice.
            #[must_use]
            pub const fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

ocid!(
    /// OCID of a virtual cloud network.
    VcnId
);
ocid!(
    /// OCID of a subnet.
    SubnetId
);
ocid!(
    /// OCID of a compute instance.
    InstanceId
);
ocid!(
    /// OCID of a virtual network interface card.
    VnicId
);
ocid!(
    /// OCID of a VNIC attachment.
    VnicAttachmentId
);
