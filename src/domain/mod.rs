pub mod error;
pub mod model;
pub mod state;

pub use error::AppError;
pub use model::{DownloadCompletion, DownloadMode, DownloadRequest, Outcome, TitleResult};
pub use state::{FormState, MetadataTicket};
