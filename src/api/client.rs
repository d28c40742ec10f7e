use super::endpoint::Endpoint;
use super::llm::{ChatClient, FragmentStream};
use super::request::build_request;
use super::stream::{empty_stream, spawn_fragment_stream};
use super::types::{
    ApiKey, ChatCompletionObject, ChatCompletionRequest, CreateKeyRequest, CreatedKey, CurrentKey,
    DataResponse, DeletedKey, Model, ModelFilter, UpdateKeyRequest,
};
use crate::core::error::decode_error_body;
use crate::core::{ClientConfig, OpenRouterError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    header::{HeaderValue, ACCEPT},
    Client, StatusCode,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Client for the OpenRouter API.
///
/// Cheap to clone; clones share the HTTP client and the configuration.
/// Every call is a single attempt, there are no retries.
#[derive(Clone, Debug)]
pub struct OpenRouterClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl OpenRouterClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Uses a caller-provided `reqwest::Client`, e.g. one with custom timeouts.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends the endpoint's request and decodes the body as `T`.
    ///
    /// A status other than the endpoint's expected one is always a classified error.
    pub async fn execute<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, OpenRouterError> {
        let request = build_request(&self.http, &self.config, endpoint)?;
        debug!("[Request] {} {}", request.method(), request.url().path());

        let response = self.http.execute(request).await?;
        let status = response.status();
        let expected = endpoint.expected_status();
        if status != expected {
            // A truncated error body still yields the status-based error.
            let body = response.bytes().await.unwrap_or_default();
            debug!("[Response] unexpected status: {status}, {} bytes", body.len());
            return decode_response(status, expected, &body);
        }

        let body = response.bytes().await?;
        debug!("[Response] status: {status}, {} bytes", body.len());
        decode_response(status, expected, &body)
    }

    /// Streams the response text of a chat endpoint.
    ///
    /// Only a non-200 status surfaces as an error. Failing to connect, or losing
    /// the connection midway, ends the stream quietly.
    pub async fn stream(&self, endpoint: Endpoint) -> Result<FragmentStream, OpenRouterError> {
        let endpoint = endpoint.into_streaming();
        let mut request = build_request(&self.http, &self.config, &endpoint)?;
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        debug!("[Request] streaming {} {}", request.method(), request.url().path());

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let failure = OpenRouterError::StreamingFailure(e.to_string());
                warn!("[Stream] could not open stream: {failure}");
                return Ok(empty_stream());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.bytes().await.unwrap_or_default();
            return Err(OpenRouterError::classify(
                status.as_u16(),
                decode_error_body(&body),
            ));
        }

        Ok(spawn_fragment_stream(response))
    }

    pub async fn list_models(&self, filter: ModelFilter) -> Result<Vec<Model>, OpenRouterError> {
        let response: DataResponse<Vec<Model>> =
            self.execute(&Endpoint::ListModels(filter)).await?;
        Ok(response.data)
    }

    /// Models filtered by the account's provider preferences.
    pub async fn list_user_models(&self) -> Result<Vec<Model>, OpenRouterError> {
        let response: DataResponse<Vec<Model>> = self.execute(&Endpoint::ListUserModels).await?;
        Ok(response.data)
    }

    pub async fn list_keys(
        &self,
        include_disabled: Option<bool>,
        offset: Option<u32>,
    ) -> Result<Vec<ApiKey>, OpenRouterError> {
        let endpoint = Endpoint::ListKeys {
            include_disabled,
            offset,
        };
        let response: DataResponse<Vec<ApiKey>> = self.execute(&endpoint).await?;
        Ok(response.data)
    }

    pub async fn create_key(&self, request: CreateKeyRequest) -> Result<CreatedKey, OpenRouterError> {
        self.execute(&Endpoint::CreateKey(request)).await
    }

    pub async fn get_key(&self, hash: impl Into<String>) -> Result<ApiKey, OpenRouterError> {
        let endpoint = Endpoint::GetKey { hash: hash.into() };
        let response: DataResponse<ApiKey> = self.execute(&endpoint).await?;
        Ok(response.data)
    }

    pub async fn update_key(
        &self,
        hash: impl Into<String>,
        update: UpdateKeyRequest,
    ) -> Result<ApiKey, OpenRouterError> {
        let endpoint = Endpoint::UpdateKey {
            hash: hash.into(),
            update,
        };
        let response: DataResponse<ApiKey> = self.execute(&endpoint).await?;
        Ok(response.data)
    }

    pub async fn delete_key(&self, hash: impl Into<String>) -> Result<DeletedKey, OpenRouterError> {
        let endpoint = Endpoint::DeleteKey { hash: hash.into() };
        let response: DataResponse<DeletedKey> = self.execute(&endpoint).await?;
        Ok(response.data)
    }

    pub async fn current_key(&self) -> Result<CurrentKey, OpenRouterError> {
        let response: DataResponse<CurrentKey> = self.execute(&Endpoint::CurrentKey).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn chat(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionObject, OpenRouterError> {
        self.execute(&Endpoint::ChatCompletions(request)).await
    }

    async fn chat_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream, OpenRouterError> {
        self.stream(Endpoint::ChatCompletions(request)).await
    }
}

/// Turns a status and body into the endpoint's result type or a classified error.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    expected: StatusCode,
    body: &[u8],
) -> Result<T, OpenRouterError> {
    if status != expected {
        return Err(OpenRouterError::classify(
            status.as_u16(),
            decode_error_body(body),
        ));
    }

    decode_success(body).map_err(|e| error_from_success_body(status, body, &e))
}

fn decode_success<T: DeserializeOwned>(body: &[u8]) -> Result<T, OpenRouterError> {
    serde_json::from_slice(body).map_err(|e| OpenRouterError::Decoding(e.to_string()))
}

/// The server can answer with the expected status and an error envelope as the body.
/// The code inside the envelope wins over the HTTP status.
fn error_from_success_body(
    status: StatusCode,
    body: &[u8],
    decode_error: &OpenRouterError,
) -> OpenRouterError {
    warn!("[Response] status {status} but body did not decode: {decode_error}");
    let error_body = decode_error_body(body);
    let code = error_body
        .as_ref()
        .and_then(|body| body.error.code)
        .unwrap_or_else(|| status.as_u16());
    OpenRouterError::classify(code, error_body)
}
