use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::models::{
    ApiConfig, DeploymentTarget, DownloadPayload, DownloadRequestBody, InfoRequest, InfoResponse,
    PayloadKind, StoredPathResponse,
};

const INFO_PATH: &str = "youtube/info";
const DOWNLOAD_PATH: &str = "youtube/download";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn deployment(&self) -> DeploymentTarget {
        self.config.deployment()
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let endpoint = self.config.endpoint(path);
        debug!(%endpoint, "POST");

        let response = self.http.post(&endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response)
    }

    /// Look up the title(s) behind a video or playlist URL
    pub async fn fetch_info(&self, url: &str) -> Result<InfoResponse> {
        let response = self.post(INFO_PATH, &InfoRequest { url }).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Ask the backend to convert and deliver the request
    pub async fn download(
        &self,
        body: &DownloadRequestBody,
        kind: PayloadKind,
    ) -> Result<DownloadPayload> {
        let response = self.post(DOWNLOAD_PATH, body).await?;

        match kind {
            PayloadKind::Binary => Ok(DownloadPayload::Binary(response.bytes().await?)),
            PayloadKind::ServerPath => {
                let stored: StoredPathResponse = response
                    .json()
                    .await
                    .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;
                Ok(DownloadPayload::ServerPath(stored.path))
            }
        }
    }
}
