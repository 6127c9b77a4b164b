use std::fmt;
use std::path::PathBuf;

/// What the backend should fetch: one video or a whole playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    #[default]
    Single,
    Collection,
}

impl DownloadMode {
    pub const ALL: [DownloadMode; 2] = [DownloadMode::Single, DownloadMode::Collection];

    /// Value sent as `type` to the backend.
    pub fn wire_name(self) -> &'static str {
        match self {
            DownloadMode::Single => "video",
            DownloadMode::Collection => "playlist",
        }
    }

    /// Substring a URL must contain to be accepted for this mode.
    pub fn url_marker(self) -> &'static str {
        match self {
            DownloadMode::Single => "watch",
            DownloadMode::Collection => "playlist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DownloadMode::Single => "a single video",
            DownloadMode::Collection => "a playlist",
        }
    }

    pub fn accepts(self, url: &str) -> bool {
        !url.is_empty() && url.contains(self.url_marker())
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Single => write!(f, "Single video"),
            DownloadMode::Collection => write!(f, "Full playlist"),
        }
    }
}

/// Title(s) reported by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TitleResult {
    #[default]
    Empty,
    Single(String),
    Many(Vec<String>),
}

impl TitleResult {
    /// Playlists come back as one string with a title per line.
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            None => TitleResult::Empty,
            Some(title) if title.is_empty() => TitleResult::Empty,
            Some(title) if title.contains('\n') => TitleResult::Many(
                title
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Some(title) => TitleResult::Single(title),
        }
    }

    pub fn single(&self) -> Option<&str> {
        match self {
            TitleResult::Single(title) => Some(title),
            _ => None,
        }
    }

    pub fn many(&self) -> Option<&[String]> {
        match self {
            TitleResult::Many(titles) if !titles.is_empty() => Some(titles),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Snapshot of the form taken when the user presses download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub mode: DownloadMode,
    pub folder_name: String,
    /// File name without extension for a locally saved payload.
    pub file_stem: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadCompletion {
    /// Payload written on this machine.
    Saved(PathBuf),
    /// Backend kept the files and reported where.
    StoredOnServer(String),
}
