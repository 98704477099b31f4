pub mod api;
pub mod error;
pub mod types;

pub use api::{AnalysisClient, ClientOptions};
pub use error::{ClientError, ClientResult};
pub use types::*;
