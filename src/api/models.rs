use serde::{Deserialize, Serialize};
use url::Url;

/// Request body for the /youtube/info endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InfoRequest<'a> {
    pub url: &'a str,
}

/// Response from the /youtube/info endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for the /youtube/download endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequestBody {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "folderName")]
    pub folder_name: String,
}

/// JSON response for playlists kept on the server
#[derive(Debug, Clone, Deserialize)]
pub struct StoredPathResponse {
    pub path: String,
}

/// How the download endpoint answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Binary,
    ServerPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPayload {
    Binary(bytes::Bytes),
    ServerPath(String),
}

/// Local backends store playlists on disk, hosted ones stream a zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentTarget {
    Local,
    Hosted,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub deployment: Option<DeploymentTarget>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            deployment: None,
        }
    }
}

impl ApiConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn deployment(&self) -> DeploymentTarget {
        if let Some(target) = self.deployment {
            return target;
        }

        let host = Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));

        match host.as_deref() {
            Some("localhost" | "127.0.0.1" | "[::1]" | "::1" | "0.0.0.0") => DeploymentTarget::Local,
            _ => DeploymentTarget::Hosted,
        }
    }
}
