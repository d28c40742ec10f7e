use super::types::{ChatCompletionObject, ChatCompletionRequest};
use crate::core::OpenRouterError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Text fragments of a streamed completion, in arrival order.
///
/// The stream never yields errors: a dropped connection looks like a normal end.
pub type FragmentStream = Pin<Box<dyn Stream<Item = String> + Send + 'static>>;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat request and wait for the complete response
    async fn chat(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionObject, OpenRouterError>;

    /// Send a chat request and receive the response text as it is generated
    async fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream, OpenRouterError>;
}
