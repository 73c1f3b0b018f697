//! OCI credential profile loading.
//!
//! Profiles live in an INI file (by default `~/.oci/config`). Values in the
//! `[DEFAULT]` section are inherited by every named profile, which may
//! override them.

use std::collections::BTreeMap;

use camino::Utf8Path;
use thiserror::Error;

use crate::key::{expand_path, read_to_string_ambient};

/// Default location of the OCI configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "~/.oci/config";

/// Name of the profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

const REQUIRED_KEYS: [&str; 5] = ["user", "fingerprint", "key_file", "tenancy", "region"];

/// Errors raised while loading or validating a profile.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ProfileError {
    /// Raised when the configuration file cannot be read.
    #[error("failed to read OCI config `{path}`: {message}")]
    Read {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Raised when a line cannot be parsed.
    #[error("malformed OCI config at line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// Raised when the requested profile has no section.
    #[error("profile `{0}` not found in OCI config")]
    UnknownProfile(String),
    /// Raised when a required key is absent or empty.
    #[error("profile `{profile}` is missing `{key}`")]
    MissingKey {
        /// Profile being loaded.
        profile: String,
        /// Missing key.
        key: String,
    },
    /// Raised when a value has the wrong shape.
    #[error("invalid `{key}` in OCI config: {message}")]
    InvalidValue {
        /// Offending key.
        key: String,
        /// Description of the problem.
        message: String,
    },
}

/// Credentials and region resolved from an OCI profile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OciProfile {
    /// Profile name the values were read from.
    pub name: String,
    /// OCID of the API signing user.
    pub user: String,
    /// Fingerprint of the API signing key.
    pub fingerprint: String,
    /// Path to the PEM private key, already expanded.
    pub key_file: String,
    /// OCID of the tenancy, also used as the root compartment.
    pub tenancy: String,
    /// Region identifier (for example `us-ashburn-1`).
    pub region: String,
    /// Passphrase for an encrypted private key.
    pub pass_phrase: Option<String>,
}

impl OciProfile {
    /// Loads `profile` from the INI file at `path` (tilde and environment
    /// variables are expanded).
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] when the file cannot be read or parsed, or the
    /// profile is incomplete.
    pub fn load(path: &str, profile: &str) -> Result<Self, ProfileError> {
        let expanded = expand_path(path);
        let contents = read_to_string_ambient(Utf8Path::new(&expanded)).map_err(|message| {
            ProfileError::Read {
                path: expanded.clone(),
                message,
            }
        })?;
        tracing::debug!(path = %expanded, profile, "loading OCI profile");
        Self::parse(&contents, profile)
    }

    /// Parses `profile` out of INI `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] when parsing or validation fails.
    pub fn parse(contents: &str, profile: &str) -> Result<Self, ProfileError> {
        let sections = parse_sections(contents)?;
        let defaults = sections.get(DEFAULT_PROFILE);
        let selected = sections.get(profile);
        if selected.is_none() && !(profile == DEFAULT_PROFILE && defaults.is_some()) {
            return Err(ProfileError::UnknownProfile(profile.to_owned()));
        }

        let mut values = defaults.cloned().unwrap_or_default();
        if let Some(overrides) = selected {
            values.extend(overrides.clone());
        }

        let missing = REQUIRED_KEYS
            .iter()
            .find(|key| values.get(**key).is_none_or(|value| value.trim().is_empty()));
        if let Some(key) = missing {
            return Err(ProfileError::MissingKey {
                profile: profile.to_owned(),
                key: (*key).to_owned(),
            });
        }

        let take = |key: &str| values.get(key).cloned().unwrap_or_default();
        let parsed = Self {
            name: profile.to_owned(),
            user: take("user"),
            fingerprint: take("fingerprint"),
            key_file: expand_path(&take("key_file")),
            tenancy: take("tenancy"),
            region: take("region"),
            pass_phrase: values
                .get("pass_phrase")
                .filter(|value| !value.is_empty())
                .cloned(),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks identifier and fingerprint formats.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidValue`] when `user` or `tenancy` is not
    /// an OCID, or `fingerprint` is not 16 colon-separated hex pairs.
    pub fn validate(&self) -> Result<(), ProfileError> {
        validate_ocid("user", &self.user)?;
        validate_ocid("tenancy", &self.tenancy)?;
        validate_fingerprint(&self.fingerprint)
    }

    /// Key identifier used in request signatures.
    #[must_use]
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

fn parse_sections(contents: &str) -> Result<Sections, ProfileError> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ProfileError::Parse {
                    line: index + 1,
                    message: format!("invalid section header `{line}`"),
                })?;
            sections.entry(name.to_owned()).or_default();
            current = Some(name.to_owned());
            continue;
        }

        let Some(section) = current.as_ref() else {
            return Err(ProfileError::Parse {
                line: index + 1,
                message: String::from("key outside of a section"),
            });
        };
        let Some((key, value)) = line.split_once(['=', ':']) else {
            return Err(ProfileError::Parse {
                line: index + 1,
                message: format!("expected `key = value`, found `{line}`"),
            });
        };
        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok(sections)
}

fn validate_ocid(key: &str, value: &str) -> Result<(), ProfileError> {
    let parts: Vec<&str> = value.split('.').collect();
    let well_formed = value.starts_with("ocid1.")
        && parts.len() >= 5
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | ':'));
    if well_formed {
        Ok(())
    } else {
        Err(ProfileError::InvalidValue {
            key: key.to_owned(),
            message: format!("`{value}` is not an OCID"),
        })
    }
}

fn validate_fingerprint(value: &str) -> Result<(), ProfileError> {
    let pairs: Vec<&str> = value.split(':').collect();
    let well_formed = pairs.len() == 16
        && pairs.iter().all(|pair| {
            pair.len() == 2
                && pair
                    .chars()
                    .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
        });
    if well_formed {
        Ok(())
    } else {
        Err(ProfileError::InvalidValue {
            key: String::from("fingerprint"),
            message: String::from("expected 16 colon-separated lowercase hex pairs"),
        })
    }
}
