pub mod chat_completion_chunk;
pub mod chat_completion_object;
pub mod chat_completion_request;
pub mod keys;
pub mod message;
pub mod models;
pub mod shared;

pub use chat_completion_chunk::{ChatCompletionChunk, ChunkChoice, Delta};
pub use chat_completion_object::{ChatCompletionObject, Choice, ResponseMessage};
pub use chat_completion_request::{
    ChatCompletionRequest, DataCollection, JsonSchema, ProviderPreferences, Reasoning,
    ReasoningEffort, ResponseFormat,
};
pub use keys::{ApiKey, CreateKeyRequest, CreatedKey, CurrentKey, DeletedKey, UpdateKeyRequest};
pub use message::{
    Content, ContentPart, FunctionCall, FunctionDescription, ImageDetail, ImageUrl, Message,
    Role, Tool, ToolCall, ToolChoice,
};
pub use models::{Model, ModelFilter};
pub use shared::{DataResponse, Usage};
