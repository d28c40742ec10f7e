use serde::{Deserialize, Serialize};

/// Query filters for `GET /models`. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    pub category: Option<String>,
    /// Only models supporting all of these parameters
    pub supported_parameters: Option<Vec<String>>,
    pub use_rss: Option<bool>,
    pub use_rss_chat_links: Option<bool>,
}

impl ModelFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_provider: Option<TopProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_parameters: Option<Vec<String>>,
}

/// Prices are USD per token, sent as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub prompt: String,
    pub completion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_modalities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_modalities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruct_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u64>,
    #[serde(default)]
    pub is_moderated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::shared::DataResponse;

    #[test]
    fn test_decode_models_listing() {
        let body = r#"{"data":[{
            "id": "openai/gpt-4o",
            "name": "OpenAI: GPT-4o",
            "created": 1715367049,
            "context_length": 128000,
            "pricing": {"prompt": "0.0000025", "completion": "0.00001", "request": "0", "image": "0.003613"},
            "architecture": {"modality": "text+image->text", "input_modalities": ["text", "image"], "output_modalities": ["text"], "tokenizer": "GPT", "instruct_type": null},
            "top_provider": {"context_length": 128000, "max_completion_tokens": 16384, "is_moderated": true},
            "supported_parameters": ["tools", "temperature"]
        }, {"id": "m/min", "name": "Minimal"}]}"#;

        let models: DataResponse<Vec<Model>> = serde_json::from_str(body).unwrap();
        assert_eq!(models.data.len(), 2);
        let gpt = &models.data[0];
        assert_eq!(gpt.pricing.as_ref().unwrap().completion, "0.00001");
        assert!(gpt.top_provider.as_ref().unwrap().is_moderated);
        assert!(gpt.architecture.as_ref().unwrap().instruct_type.is_none());
        assert!(models.data[1].pricing.is_none());
    }
}
