pub mod download_coordinator;
pub mod save_target;

pub use download_coordinator::DownloadCoordinator;
pub use save_target::{DialogSaveTarget, DirectorySaveTarget, SaveTarget};
