pub mod error;
mod settings;

pub use error::ApiErrorDetail;
pub use error::ErrorResponse;
pub use error::OpenRouterError;
pub use settings::ClientConfig;
pub use settings::Settings;
pub use settings::DEFAULT_BASE_URL;
