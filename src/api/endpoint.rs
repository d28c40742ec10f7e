use super::types::{ChatCompletionRequest, CreateKeyRequest, ModelFilter, UpdateKeyRequest};
use reqwest::{Method, StatusCode};
use serde::Serialize;

/// One logical API operation. Pure data: turning it into HTTP is the request builder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    ChatCompletions(ChatCompletionRequest),
    ListModels(ModelFilter),
    ListUserModels,
    ListKeys {
        include_disabled: Option<bool>,
        offset: Option<u32>,
    },
    CreateKey(CreateKeyRequest),
    GetKey {
        hash: String,
    },
    UpdateKey {
        hash: String,
        update: UpdateKeyRequest,
    },
    DeleteKey {
        hash: String,
    },
    CurrentKey,
}

/// Request body of an endpoint, serialized as the inner value.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Body<'a> {
    Chat(&'a ChatCompletionRequest),
    CreateKey(&'a CreateKeyRequest),
    UpdateKey(&'a UpdateKeyRequest),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::ChatCompletions(_) | Self::CreateKey(_) => Method::POST,
            Self::ListModels(_)
            | Self::ListUserModels
            | Self::ListKeys { .. }
            | Self::GetKey { .. }
            | Self::CurrentKey => Method::GET,
            Self::UpdateKey { .. } => Method::PATCH,
            Self::DeleteKey { .. } => Method::DELETE,
        }
    }

    /// Path segments relative to the base URL. A key hash is always one segment.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Self::ChatCompletions(_) => vec!["chat", "completions"],
            Self::ListModels(_) => vec!["models"],
            Self::ListUserModels => vec!["models", "user"],
            Self::ListKeys { .. } | Self::CreateKey(_) => vec!["keys"],
            Self::GetKey { hash } | Self::UpdateKey { hash, .. } | Self::DeleteKey { hash } => {
                vec!["keys", hash.as_str()]
            }
            Self::CurrentKey => vec!["key"],
        }
    }

    /// Unencoded path starting with `/`, for logs and diagnostics.
    pub fn path(&self) -> String {
        format!("/{}", self.path_segments().join("/"))
    }

    /// Query parameters in a fixed order. `None` when there is nothing to send.
    pub fn query(&self) -> Option<Vec<(&'static str, String)>> {
        let mut params = Vec::new();
        match self {
            Self::ListModels(filter) => {
                if let Some(category) = &filter.category {
                    params.push(("category", category.clone()));
                }
                if let Some(supported) = &filter.supported_parameters {
                    params.push(("supported_parameters", supported.join(",")));
                }
                if let Some(use_rss) = filter.use_rss {
                    params.push(("use_rss", use_rss.to_string()));
                }
                if let Some(links) = filter.use_rss_chat_links {
                    params.push(("use_rss_chat_links", links.to_string()));
                }
            }
            Self::ListKeys {
                include_disabled,
                offset,
            } => {
                if let Some(include_disabled) = include_disabled {
                    params.push(("include_disabled", include_disabled.to_string()));
                }
                if let Some(offset) = offset {
                    params.push(("offset", offset.to_string()));
                }
            }
            _ => {}
        }
        (!params.is_empty()).then_some(params)
    }

    pub const fn body(&self) -> Option<Body<'_>> {
        match self {
            Self::ChatCompletions(request) => Some(Body::Chat(request)),
            Self::CreateKey(request) => Some(Body::CreateKey(request)),
            Self::UpdateKey { update, .. } => Some(Body::UpdateKey(update)),
            _ => None,
        }
    }

    pub const fn expected_status(&self) -> StatusCode {
        match self {
            Self::CreateKey(_) => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    /// Forces `stream: true` on chat requests, whatever the caller set.
    pub fn into_streaming(self) -> Self {
        match self {
            Self::ChatCompletions(mut request) => {
                request.stream = Some(true);
                Self::ChatCompletions(request)
            }
            other => other,
        }
    }
}
