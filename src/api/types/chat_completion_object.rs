use super::message::{Role, ToolCall};
use super::shared::Usage;
use serde::{Deserialize, Serialize};

/// Response of a non-streaming chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionObject {
    pub id: String,
    pub choices: Vec<Choice>,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,
    /// Upstream provider that served the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletionObject {
    /// Text of the first choice, if it has any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: Role,
    /// `null` when the model only produced tool calls
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::message::ToolType;

    #[test]
    fn test_decode_minimal_response() {
        let body = r#"{"id":"x","choices":[{"message":{"role":"assistant","content":"hello"}}],"model":"m"}"#;
        let response: ChatCompletionObject = serde_json::from_str(body).unwrap();
        assert_eq!(response.id, "x");
        assert_eq!(response.model, "m");
        assert_eq!(response.content(), Some("hello"));
        assert!(response.usage.is_none());
        assert!(response.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_decode_usage_with_reasoning_breakdown() {
        let body = r#"{
            "id": "gen-1",
            "provider": "OpenAI",
            "model": "openai/o3-mini",
            "object": "chat.completion",
            "created": 1735689600,
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "native_finish_reason": "stop",
                "message": {"role": "assistant", "content": "4", "reasoning": "2+2"}
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 20,
                "total_tokens": 30,
                "completion_tokens_details": {"reasoning_tokens": 12}
            }
        }"#;
        let response: ChatCompletionObject = serde_json::from_str(body).unwrap();
        let usage = response.usage.expect("usage present");
        assert_eq!(usage.total_tokens, 30);
        assert_eq!(
            usage.completion_tokens_details.map(|d| d.reasoning_tokens),
            Some(12)
        );
        assert_eq!(response.choices[0].message.reasoning.as_deref(), Some("2+2"));
        assert_eq!(response.provider.as_deref(), Some("OpenAI"));
    }

    #[test]
    fn test_decode_tool_call_response() {
        let body = r#"{
            "id": "gen-2",
            "model": "m",
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"Oslo\"}"}
                    }]
                }
            }]
        }"#;
        let response: ChatCompletionObject = serde_json::from_str(body).unwrap();
        assert_eq!(response.content(), None);
        let calls = response.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].call_type, ToolType::Function);
        assert_eq!(calls[0].function.name, "get_weather");
    }
}
