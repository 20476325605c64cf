pub mod config;
pub mod http;
pub mod traits;

pub use config::TutorConfig;
pub use http::HttpTutorClient;
pub use traits::{ArtifactRequest, RespondReply, RespondRequest, TutorClient};
