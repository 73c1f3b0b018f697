//! OCI request signing (HTTP Signatures, version 1, `rsa-sha256`).
//!
//! Every request signs `date`, `(request-target)` and `host`. Requests with a
//! body additionally sign `content-length`, `content-type` and
//! `x-content-sha256`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::key::read_to_string_ambient;
use crate::profile::OciProfile;

/// Content type used for every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const ENCRYPTED_PKCS8_LABEL: &str = "BEGIN ENCRYPTED PRIVATE KEY";
const BASE_HEADERS: &str = "date (request-target) host";
const BODY_HEADERS: &str = "date (request-target) host content-length content-type x-content-sha256";

/// Errors raised while preparing or producing a request signature.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SignerError {
    /// Raised when the private key file cannot be read.
    #[error("failed to read private key `{path}`: {message}")]
    ReadKey {
        /// Path of the key file.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Raised for legacy `Proc-Type: 4,ENCRYPTED` PEM blocks. Only encrypted
    /// PKCS#8 keys can be decrypted.
    #[error("private key `{0}` uses legacy PEM encryption; convert it to encrypted PKCS#8")]
    EncryptedKey(String),
    /// Raised when an encrypted PKCS#8 key is supplied without a passphrase.
    #[error("private key `{0}` is encrypted but no pass_phrase was configured")]
    MissingPassphrase(String),
    /// Raised when the PEM content is not an RSA private key.
    #[error("invalid RSA private key: {0}")]
    InvalidKey(String),
    /// Raised when the URL has no host to sign.
    #[error("request URL `{0}` has no host")]
    MissingHost(String),
    /// Raised when the RSA signing primitive fails.
    #[error("signature failed: {0}")]
    Sign(String),
}

/// Headers the transport must attach for a body-carrying request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentHeaders {
    /// Value of `content-length`.
    pub length: usize,
    /// Value of `x-content-sha256` (base64 SHA-256 of the body).
    pub sha256: String,
}

/// Output of [`RequestSigner::sign`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedRequest {
    /// Value of the `date` header that was signed.
    pub date: String,
    /// Value of the `authorization` header.
    pub authorization: String,
    /// Content headers for requests with a body.
    pub content: Option<ContentHeaders>,
}

/// Signs OCI API requests with an API signing key.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    signing_key: SigningKey<Sha256>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Builds a signer from unencrypted PEM text (PKCS#8 or PKCS#1).
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::MissingPassphrase`] for encrypted PKCS#8 keys,
    /// [`SignerError::EncryptedKey`] for legacy encrypted PEM and
    /// [`SignerError::InvalidKey`] when decoding fails.
    pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self, SignerError> {
        Self::from_pem_with_passphrase(key_id, pem, None)
    }

    /// Builds a signer from PEM text, decrypting encrypted PKCS#8 keys with
    /// `passphrase`. The passphrase is ignored for unencrypted keys.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::MissingPassphrase`] when an encrypted key comes
    /// without a passphrase, [`SignerError::EncryptedKey`] for legacy
    /// encrypted PEM and [`SignerError::InvalidKey`] when decoding or
    /// decryption fails.
    pub fn from_pem_with_passphrase(
        key_id: impl Into<String>,
        pem: &str,
        passphrase: Option<&str>,
    ) -> Result<Self, SignerError> {
        let id = key_id.into();
        let private_key = if pem.contains(ENCRYPTED_PKCS8_LABEL) {
            let Some(secret) = passphrase else {
                return Err(SignerError::MissingPassphrase(id));
            };
            RsaPrivateKey::from_pkcs8_encrypted_pem(pem, secret)
                .map_err(|err| SignerError::InvalidKey(err.to_string()))?
        } else if pem.contains("ENCRYPTED") {
            return Err(SignerError::EncryptedKey(id));
        } else {
            RsaPrivateKey::from_pkcs8_pem(pem)
                .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
                .map_err(|err| SignerError::InvalidKey(err.to_string()))?
        };
        Ok(Self {
            key_id: id,
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Builds a signer from a profile's `key_file`, using its `pass_phrase`
    /// for encrypted keys.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] when the key cannot be read, decrypted or
    /// decoded.
    pub fn from_profile(profile: &OciProfile) -> Result<Self, SignerError> {
        let pem = read_to_string_ambient(Utf8Path::new(&profile.key_file)).map_err(|message| {
            SignerError::ReadKey {
                path: profile.key_file.clone(),
                message,
            }
        })?;
        Self::from_pem_with_passphrase(profile.key_id(), &pem, profile.pass_phrase.as_deref())
    }

    /// Key identifier placed in the `authorization` header.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs a request made at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::MissingHost`] for host-less URLs and
    /// [`SignerError::Sign`] when the RSA operation fails.
    pub fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
        now: DateTime<Utc>,
    ) -> Result<SignedRequest, SignerError> {
        let date = http_date(now);
        let host = host_header(url)?;
        let content = body.map(|bytes| ContentHeaders {
            length: bytes.len(),
            sha256: STANDARD.encode(Sha256::digest(bytes)),
        });
        let (headers, signing_string) =
            signing_string(method, url, &host, &date, content.as_ref());

        let signature = self
            .signing_key
            .try_sign(signing_string.as_bytes())
            .map_err(|err| SignerError::Sign(err.to_string()))?;
        let authorization = format!(
            "Signature version=\"1\",keyId=\"{}\",algorithm=\"rsa-sha256\",headers=\"{headers}\",signature=\"{}\"",
            self.key_id,
            STANDARD.encode(signature.to_bytes())
        );

        Ok(SignedRequest {
            date,
            authorization,
            content,
        })
    }
}

/// Formats a timestamp as an RFC 7231 HTTP date.
#[must_use]
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn host_header(url: &Url) -> Result<String, SignerError> {
    let host = url
        .host_str()
        .ok_or_else(|| SignerError::MissingHost(url.to_string()))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

fn request_target(method: &Method, url: &Url) -> String {
    let verb = method.as_str().to_ascii_lowercase();
    match url.query() {
        Some(query) => format!("{verb} {}?{query}", url.path()),
        None => format!("{verb} {}", url.path()),
    }
}

fn signing_string(
    method: &Method,
    url: &Url,
    host: &str,
    date: &str,
    content: Option<&ContentHeaders>,
) -> (&'static str, String) {
    let mut lines = vec![
        format!("date: {date}"),
        format!("(request-target): {}", request_target(method, url)),
        format!("host: {host}"),
    ];
    let Some(headers) = content else {
        return (BASE_HEADERS, lines.join("\n"));
    };
    lines.push(format!("content-length: {}", headers.length));
    lines.push(format!("content-type: {JSON_CONTENT_TYPE}"));
    lines.push(format!("x-content-sha256: {}", headers.sha256));
    (BODY_HEADERS, lines.join("\n"))
}
