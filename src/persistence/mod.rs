// Persistence module for TDengine integration
pub mod schema;
pub mod tdengine;
pub mod volume_history;

pub use tdengine::TDengineClient;
pub use volume_history::{TDengineVolumeHistory, VolumeFilterRow, VolumeHistory};
