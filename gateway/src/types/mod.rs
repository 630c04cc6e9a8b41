/// Environment configuration
pub mod environment;
/// Error responses
pub mod error;
/// Request extractors
pub mod extractors;

pub use environment::Environment;
pub use error::AppError;
pub use extractors::ImageUpload;
