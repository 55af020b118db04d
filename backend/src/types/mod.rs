pub mod envelope;
pub mod environment;
mod error;
mod extractors;
mod resource_id;

pub use envelope::ApiEnvelope;
pub use environment::Environment;
pub use error::AppError;
pub use extractors::ValidatedJson;
pub use resource_id::ResourceId;
