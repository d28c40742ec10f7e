pub mod api;
pub mod cli;
pub mod core;
pub mod eventsource;

pub use api::types::{ChatCompletionObject, ChatCompletionRequest, Content, ContentPart, Message, Role};
pub use api::{ChatClient, Endpoint, FragmentStream, OpenRouterClient};
pub use crate::core::{ClientConfig, OpenRouterError};
