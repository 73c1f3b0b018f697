//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

#![allow(dead_code, reason = "each test crate uses a different subset")]

/// Root compartment (tenancy) used by launch plans.
pub const COMPARTMENT_ID: &str = "ocid1.tenancy.oc1..aaaaaaaatest";

/// Default availability domain shipped with `oci-launch`.
pub const AVAILABILITY_DOMAIN: &str = "ZMvy:US-ASHBURN-AD-2";

/// Default always-free shape shipped with `oci-launch`.
pub const SHAPE: &str = "VM.Standard.E2.1.Micro";

/// Default boot image shipped with `oci-launch`.
pub const IMAGE_ID: &str =
    "ocid1.image.oc1.iad.aaaaaaaa6blpytk5nu622uj7trevp7kjxihx4byt4q6botynbyjpknk7zwna";

/// CIDR block shared by the VCN and subnet.
pub const CIDR_BLOCK: &str = "10.0.0.0/24";

/// Public key text, trailing newline included, as read from disk.
pub const PUBLIC_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAITest launch@example\n";
