pub mod client;
pub mod endpoint;
pub mod llm;
pub mod request;
pub mod stream;
pub mod types;

pub use client::OpenRouterClient;
pub use endpoint::Endpoint;
pub use llm::{ChatClient, FragmentStream};
