use tracing::debug;

use super::error::AppError;
use super::model::{DownloadCompletion, DownloadMode, DownloadRequest, Outcome, TitleResult};
use crate::utils::sanitize_filename;

pub const DEFAULT_TRACK_NAME: &str = "musica";
pub const DEFAULT_PLAYLIST_NAME: &str = "playlist";

const DOWNLOAD_FAILED: &str = "Error processing the download.";

/// Issued when the draft warrants a title lookup. Responses carrying an
/// older `seq` are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTicket {
    pub seq: u64,
    pub url: String,
}

/// Everything the download form shows, with one transition per event.
#[derive(Debug, Default)]
pub struct FormState {
    url: String,
    mode: DownloadMode,
    folder_name: String,
    title: TitleResult,
    validating: bool,
    downloading: bool,
    outcome: Outcome,
    metadata_seq: u64,
}

impl FormState {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn title(&self) -> &TitleResult {
        &self.title
    }

    pub fn is_validating(&self) -> bool {
        self.validating
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_valid_link(&self) -> bool {
        self.mode.accepts(&self.url)
    }

    pub fn can_submit(&self) -> bool {
        !self.downloading && !self.validating && self.is_valid_link()
    }

    pub fn set_url(&mut self, url: String) -> Option<MetadataTicket> {
        self.url = url;
        self.draft_changed()
    }

    pub fn set_mode(&mut self, mode: DownloadMode) -> Option<MetadataTicket> {
        self.mode = mode;
        self.draft_changed()
    }

    pub fn set_folder_name(&mut self, folder_name: String) {
        self.folder_name = folder_name;
    }

    fn draft_changed(&mut self) -> Option<MetadataTicket> {
        self.title = TitleResult::Empty;
        self.refresh_inline_validation();

        // Bumped even without a ticket so in-flight lookups go stale.
        self.metadata_seq += 1;

        if !self.is_valid_link() {
            self.validating = false;
            return None;
        }

        self.validating = true;
        Some(MetadataTicket {
            seq: self.metadata_seq,
            url: self.url.clone(),
        })
    }

    fn refresh_inline_validation(&mut self) {
        if !self.url.is_empty() && !self.is_valid_link() {
            self.outcome = Outcome::Error(AppError::InvalidForMode(self.mode).to_string());
        } else if self.outcome.is_error() {
            self.outcome = Outcome::None;
        }
    }

    pub fn apply_metadata(&mut self, seq: u64, title: TitleResult) {
        if seq != self.metadata_seq {
            debug!(seq, latest = self.metadata_seq, "Dropping stale title lookup");
            return;
        }
        self.title = title;
        self.validating = false;
    }

    pub fn begin_download(&mut self) -> Option<DownloadRequest> {
        if self.downloading {
            return None;
        }

        if self.url.is_empty() {
            self.outcome = Outcome::Error(AppError::EmptyUrl.to_string());
            return None;
        }

        if !self.is_valid_link() {
            self.outcome = Outcome::Error(AppError::InvalidForMode(self.mode).to_string());
            return None;
        }

        self.downloading = true;
        self.outcome = Outcome::None;

        Some(DownloadRequest {
            url: self.url.clone(),
            mode: self.mode,
            folder_name: self.folder_name.clone(),
            file_stem: self.file_stem(),
        })
    }

    fn file_stem(&self) -> String {
        let (candidate, fallback) = match self.mode {
            DownloadMode::Single => (self.title.single().unwrap_or_default(), DEFAULT_TRACK_NAME),
            DownloadMode::Collection => (self.folder_name.as_str(), DEFAULT_PLAYLIST_NAME),
        };

        let stem = sanitize_filename(candidate);
        let stem = stem.trim_matches(|c| c == '.' || c == ' ');
        if stem.is_empty() {
            fallback.to_string()
        } else {
            stem.to_string()
        }
    }

    pub fn finish_download(&mut self, result: Result<DownloadCompletion, AppError>) {
        self.downloading = false;
        self.outcome = match result {
            Ok(DownloadCompletion::Saved(_)) => Outcome::Success("Download complete!".to_string()),
            Ok(DownloadCompletion::StoredOnServer(path)) => {
                Outcome::Success(format!("Playlist saved to folder: {}", path))
            }
            Err(AppError::Cancelled) => Outcome::Error(AppError::Cancelled.to_string()),
            Err(_) => Outcome::Error(DOWNLOAD_FAILED.to_string()),
        };
    }
}
