use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    api::{ApiClient, DeploymentTarget, DownloadPayload, DownloadRequestBody, PayloadKind},
    domain::{AppError, DownloadCompletion, DownloadMode, DownloadRequest, TitleResult},
};

use super::save_target::SaveTarget;

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
    save_target: Arc<dyn SaveTarget>,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient, save_target: Arc<dyn SaveTarget>) -> Self {
        Self {
            api_client,
            save_target,
        }
    }

    /// Title lookup is best effort: any failure just means no title.
    pub async fn fetch_titles(&self, url: String) -> TitleResult {
        match self.api_client.fetch_info(&url).await {
            Ok(info) => TitleResult::from_raw(info.title),
            Err(e) => {
                debug!(%url, error = %e, "Title lookup failed");
                TitleResult::Empty
            }
        }
    }

    pub async fn download(&self, request: DownloadRequest) -> Result<DownloadCompletion, AppError> {
        let kind = match (request.mode, self.api_client.deployment()) {
            (DownloadMode::Collection, DeploymentTarget::Local) => PayloadKind::ServerPath,
            _ => PayloadKind::Binary,
        };

        info!(url = %request.url, mode = request.mode.wire_name(), "Requesting download");

        let body = DownloadRequestBody {
            url: request.url,
            kind: request.mode.wire_name(),
            folder_name: request.folder_name,
        };

        let payload = self.api_client.download(&body, kind).await.map_err(|e| {
            error!(url = %body.url, error = %e, "Download request failed");
            AppError::Api(e.to_string())
        })?;

        match payload {
            DownloadPayload::ServerPath(path) => Ok(DownloadCompletion::StoredOnServer(path)),
            DownloadPayload::Binary(contents) => {
                let extension = match request.mode {
                    DownloadMode::Single => "mp3",
                    DownloadMode::Collection => "zip",
                };
                let file_name = format!("{}.{}", request.file_stem, extension);
                self.save_target
                    .save(&file_name, contents)
                    .await
                    .inspect_err(|e| {
                        if *e != AppError::Cancelled {
                            error!(file = %file_name, error = %e, "Saving download failed");
                        }
                    })
                    .map(DownloadCompletion::Saved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::application::DirectorySaveTarget;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTarget {
        saved: Mutex<Vec<(String, Bytes)>>,
    }

    #[async_trait]
    impl SaveTarget for RecordingTarget {
        async fn save(&self, file_name: &str, contents: Bytes) -> Result<PathBuf, AppError> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), contents));
            Ok(PathBuf::from("/saved").join(file_name))
        }
    }

    struct CancellingTarget;

    #[async_trait]
    impl SaveTarget for CancellingTarget {
        async fn save(&self, _file_name: &str, _contents: Bytes) -> Result<PathBuf, AppError> {
            Err(AppError::Cancelled)
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    async fn ok_download_server() -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/download")
            .with_status(200)
            .with_body(b"ID3fake")
            .create_async()
            .await;
        server
    }

    fn coordinator_with(
        server: &mockito::ServerGuard,
        save_target: Arc<dyn SaveTarget>,
    ) -> DownloadCoordinator {
        let api_client = ApiClient::new(ApiConfig {
            base_url: server.url(),
            deployment: Some(DeploymentTarget::Local),
        });
        DownloadCoordinator::new(api_client, save_target)
    }

    fn coordinator(
        server: &mockito::ServerGuard,
        deployment: DeploymentTarget,
    ) -> (DownloadCoordinator, Arc<RecordingTarget>) {
        let target = Arc::new(RecordingTarget::default());
        let api_client = ApiClient::new(ApiConfig {
            base_url: server.url(),
            deployment: Some(deployment),
        });
        (DownloadCoordinator::new(api_client, target.clone()), target)
    }

    fn request(mode: DownloadMode, url: &str, file_stem: &str) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            mode,
            folder_name: String::new(),
            file_stem: file_stem.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_titles_splits_playlist() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/info")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title":"A\nB\nC"}"#)
            .create_async()
            .await;
        let (coordinator, _) = coordinator(&server, DeploymentTarget::Local);

        let titles = coordinator
            .fetch_titles("https://x/playlist?list=1".to_string())
            .await;

        assert_eq!(
            titles,
            TitleResult::Many(vec!["A".into(), "B".into(), "C".into()])
        );
    }

    #[tokio::test]
    async fn test_fetch_titles_swallows_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/info")
            .with_status(502)
            .create_async()
            .await;
        let (coordinator, _) = coordinator(&server, DeploymentTarget::Local);

        let titles = coordinator
            .fetch_titles("https://x/watch?v=1".to_string())
            .await;

        assert_eq!(titles, TitleResult::Empty);
    }

    #[tokio::test]
    async fn test_single_download_saves_once_as_mp3() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/download")
            .with_status(200)
            .with_body(b"ID3fake")
            .create_async()
            .await;
        let (coordinator, target) = coordinator(&server, DeploymentTarget::Local);

        let completion = coordinator
            .download(request(DownloadMode::Single, "https://x/watch?v=1", "Song"))
            .await
            .unwrap();

        assert_eq!(completion, DownloadCompletion::Saved(PathBuf::from("/saved/Song.mp3")));
        let saved = target.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "Song.mp3");
        assert_eq!(saved[0].1, Bytes::from_static(b"ID3fake"));
    }

    #[tokio::test]
    async fn test_failed_download_never_saves() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/download")
            .with_status(500)
            .create_async()
            .await;
        let (coordinator, target) = coordinator(&server, DeploymentTarget::Hosted);

        let err = coordinator
            .download(request(DownloadMode::Single, "https://x/watch?v=1", "musica"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Api(_)));
        assert!(target.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_playlist_reports_server_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/youtube/download")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"path":"/srv/downloads/playlist"}"#)
            .create_async()
            .await;
        let (coordinator, target) = coordinator(&server, DeploymentTarget::Local);

        let completion = coordinator
            .download(request(
                DownloadMode::Collection,
                "https://x/playlist?list=1",
                "playlist",
            ))
            .await
            .unwrap();

        assert_eq!(
            completion,
            DownloadCompletion::StoredOnServer("/srv/downloads/playlist".to_string())
        );
        assert!(target.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hosted_playlist_saves_zip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/youtube/download")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "type": "playlist",
                "folderName": "my-songs"
            })))
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(b"PK\x03\x04")
            .create_async()
            .await;
        let (coordinator, target) = coordinator(&server, DeploymentTarget::Hosted);

        let mut req = request(
            DownloadMode::Collection,
            "https://x/playlist?list=1",
            "my-songs",
        );
        req.folder_name = "my-songs".to_string();
        coordinator.download(req).await.unwrap();

        mock.assert_async().await;
        let saved = target.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "my-songs.zip");
    }

    #[tokio::test]
    async fn test_save_failure_is_logged() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("taken");
        std::fs::write(&blocker, b"file, not dir").unwrap();

        let server = ok_download_server().await;
        let coordinator =
            coordinator_with(&server, Arc::new(DirectorySaveTarget::new(blocker)));
        let (logs, _guard) = capture_logs();

        let err = coordinator
            .download(request(DownloadMode::Single, "https://x/watch?v=1", "musica"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Io(_)));
        let logs = logs.contents();
        assert!(logs.contains("ERROR"), "{}", logs);
        assert!(logs.contains("Saving download failed"), "{}", logs);
        assert!(logs.contains("musica.mp3"), "{}", logs);
    }

    #[tokio::test]
    async fn test_cancelled_save_is_not_logged_as_error() {
        let server = ok_download_server().await;
        let coordinator = coordinator_with(&server, Arc::new(CancellingTarget));
        let (logs, _guard) = capture_logs();

        let err = coordinator
            .download(request(DownloadMode::Single, "https://x/watch?v=1", "musica"))
            .await
            .unwrap_err();

        assert_eq!(err, AppError::Cancelled);
        assert!(!logs.contents().contains("Saving download failed"));
    }
}
