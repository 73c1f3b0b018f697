//! Signed JSON transport shared by the OCI service clients.

use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::error::OciError;
use super::signer::{JSON_CONTENT_TYPE, RequestSigner};

const OPC_REQUEST_ID: &str = "opc-request-id";
const OPC_NEXT_PAGE: &str = "opc-next-page";
const X_CONTENT_SHA256: &str = "x-content-sha256";

#[derive(serde::Deserialize)]
struct ServiceErrorBody {
    code: String,
    message: String,
}

/// HTTP client bound to one service endpoint.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    http: Client,
    signer: Arc<RequestSigner>,
    base: Url,
}

impl ApiClient {
    /// Binds a client to `base`; a trailing slash is added so relative paths
    /// resolve below the API version segment.
    pub(crate) fn new(
        http: Client,
        signer: Arc<RequestSigner>,
        base: &str,
    ) -> Result<Self, OciError> {
        let normalised = if base.ends_with('/') {
            base.to_owned()
        } else {
            format!("{base}/")
        };
        let parsed = Url::parse(&normalised).map_err(|err| OciError::Endpoint {
            url: base.to_owned(),
            message: err.to_string(),
        })?;
        Ok(Self {
            http,
            signer,
            base: parsed,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, OciError> {
        let response = self.send(Method::GET, path, &[], None).await?;
        decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, OciError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body).map_err(|err| OciError::Validation(err.to_string()))?;
        let response = self.send(Method::POST, path, &[], Some(bytes)).await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), OciError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// Fetches every page of a list call by following `opc-next-page`.
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, OciError> {
        let mut items = Vec::new();
        let mut page: Option<String> = None;

        loop {
            let mut pairs = query.to_vec();
            if let Some(token) = page.as_deref() {
                pairs.push(("page", token));
            }
            let response = self.send(Method::GET, path, &pairs, None).await?;
            let next = response
                .headers()
                .get(OPC_NEXT_PAGE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let batch: Vec<T> = decode(response).await?;
            items.extend(batch);

            match next {
                Some(token) if !token.is_empty() => page = Some(token),
                _ => return Ok(items),
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Response, OciError> {
        let mut url = self.base.join(path).map_err(|err| OciError::Endpoint {
            url: format!("{}{path}", self.base),
            message: err.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let signed = self
            .signer
            .sign(&method, &url, body.as_deref(), Utc::now())?;
        let request_id = Uuid::new_v4().simple().to_string();
        debug!(%method, %url, request_id = %request_id, "sending OCI request");

        let mut request = self
            .http
            .request(method, url)
            .header(DATE, signed.date)
            .header(AUTHORIZATION, signed.authorization)
            .header(OPC_REQUEST_ID, request_id.as_str());
        if let Some(content) = signed.content {
            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .header(CONTENT_LENGTH, content.length.to_string())
                .header(X_CONTENT_SHA256, content.sha256);
        }
        if let Some(bytes) = body {
            request = request.body(bytes);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(service_error(response, request_id).await)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, OciError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| OciError::Decode(err.to_string()))
}

async fn service_error(response: Response, request_id: String) -> OciError {
    let status = response.status();
    let opc_request_id = response
        .headers()
        .get(OPC_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map_or(request_id, str::to_owned);
    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ServiceErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("Unknown").to_owned(),
            text,
        ),
    };
    OciError::Service {
        status: status.as_u16(),
        code,
        message,
        opc_request_id,
    }
}
