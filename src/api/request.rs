use super::endpoint::Endpoint;
use crate::core::{ClientConfig, OpenRouterError};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Request, Url,
};

const REFERER_HEADER: &str = "HTTP-Referer";
const TITLE_HEADER: &str = "X-Title";

/// Resolves the endpoint path and query against the configured base URL.
pub fn endpoint_url(config: &ClientConfig, endpoint: &Endpoint) -> Result<Url, OpenRouterError> {
    let base = &config.base_url;
    let mut url =
        Url::parse(base).map_err(|e| OpenRouterError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| OpenRouterError::InvalidUrl(format!("{base}: cannot be a base URL")))?
        .pop_if_empty()
        .extend(endpoint.path_segments());

    if let Some(query) = endpoint.query() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Headers sent with every request: bearer auth plus the optional attribution headers.
pub fn build_headers(config: &ClientConfig) -> Result<HeaderMap, OpenRouterError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}", key = config.api_key))
            .map_err(|_| OpenRouterError::InvalidHeader("Authorization"))?,
    );

    if let Some(referer) = &config.http_referer {
        headers.insert(
            REFERER_HEADER,
            HeaderValue::from_str(referer)
                .map_err(|_| OpenRouterError::InvalidHeader(REFERER_HEADER))?,
        );
    }
    if let Some(title) = &config.x_title {
        headers.insert(
            TITLE_HEADER,
            HeaderValue::from_str(title).map_err(|_| OpenRouterError::InvalidHeader(TITLE_HEADER))?,
        );
    }

    Ok(headers)
}

/// Builds the wire request for an endpoint. Nothing is sent if any step fails.
pub fn build_request(
    client: &Client,
    config: &ClientConfig,
    endpoint: &Endpoint,
) -> Result<Request, OpenRouterError> {
    let url = endpoint_url(config, endpoint)?;
    let mut headers = build_headers(config)?;

    let mut builder = client.request(endpoint.method(), url);
    if let Some(body) = endpoint.body() {
        let bytes = serde_json::to_vec(&body).map_err(OpenRouterError::Serialization)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        builder = builder.body(bytes);
    }

    builder.headers(headers).build().map_err(OpenRouterError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ChatCompletionRequest, Message, ModelFilter};
    use reqwest::Method;

    fn config() -> ClientConfig {
        ClientConfig::new("sk-test").with_base_url("https://example.com/api/v1")
    }

    #[test]
    fn test_chat_request_has_auth_json_body() {
        let endpoint =
            Endpoint::ChatCompletions(ChatCompletionRequest::new("m", vec![Message::user("hi")]));
        let request = build_request(&Client::new(), &config(), &endpoint).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://example.com/api/v1/chat/completions"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert!(request.headers().get(REFERER_HEADER).is_none());
        assert!(request.headers().get(TITLE_HEADER).is_none());

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_get_request_has_no_body_or_content_type() {
        let request = build_request(&Client::new(), &config(), &Endpoint::CurrentKey).unwrap();
        assert_eq!(request.method(), Method::GET);
        assert!(request.body().is_none());
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_optional_attribution_headers() {
        let config = config()
            .with_referer("https://myapp.example")
            .with_title("My App");
        let headers = build_headers(&config).unwrap();
        assert_eq!(headers[REFERER_HEADER], "https://myapp.example");
        assert_eq!(headers[TITLE_HEADER], "My App");
    }

    #[test]
    fn test_query_parameters_are_encoded() {
        let endpoint = Endpoint::ListModels(ModelFilter::category("role play"));
        let url = endpoint_url(&config(), &endpoint).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/v1/models?category=role+play"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("sk-test").with_base_url("not a url");
        let err = endpoint_url(&config, &Endpoint::CurrentKey).unwrap_err();
        assert!(matches!(err, OpenRouterError::InvalidUrl(_)));
    }

    #[test]
    fn test_key_hash_is_a_single_encoded_segment() {
        let endpoint = Endpoint::DeleteKey {
            hash: "a/b?c#d".to_string(),
        };
        let url = endpoint_url(&config(), &endpoint).unwrap();
        assert_eq!(url.path(), "/api/v1/keys/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_base_url_with_trailing_slash() {
        let config = ClientConfig {
            base_url: "https://example.com/".to_string(),
            ..ClientConfig::new("sk-test")
        };
        let url = endpoint_url(&config, &Endpoint::CurrentKey).unwrap();
        assert_eq!(url.as_str(), "https://example.com/key");
    }

    #[test]
    fn test_base_url_that_cannot_be_a_base() {
        let config = ClientConfig::new("sk-test").with_base_url("mailto:ops@example.com");
        let err = endpoint_url(&config, &Endpoint::CurrentKey).unwrap_err();
        assert!(matches!(err, OpenRouterError::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_api_key_header() {
        let config = ClientConfig::new("sk-bad\nkey");
        let err = build_headers(&config).unwrap_err();
        assert!(matches!(err, OpenRouterError::InvalidHeader("Authorization")));
    }
}
