pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod schedule;
pub mod source;
pub mod sync;
pub mod transform;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, FetchError, StorageError, SyncError, TransformError};
pub use model::{Comic, ComicId, ComicSummary};
pub use source::XkcdClient;
pub use sync::{ReconcileOutcome, Reconciler};
