// Request validation for the task endpoints

use super::errors::GatewayError;
use crate::config::ProviderConfig;

/// The fields every task request must carry, borrowed from the parsed body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields<'a> {
    pub api_key: Option<&'a str>,
    pub provider: Option<&'a str>,
    pub text: Option<&'a str>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Checks, in order: API key, provider, provider support, message text.
/// Stops at the first failure; the request itself is never modified.
pub fn validate_request(
    config: &ProviderConfig,
    fields: &RequiredFields<'_>,
) -> Result<(), GatewayError> {
    if present(fields.api_key).is_none() {
        return Err(GatewayError::ValidationFailed(
            "API Key is missing in the request.".to_string(),
        ));
    }

    let provider = match present(fields.provider) {
        Some(p) => p,
        None => {
            return Err(GatewayError::ValidationFailed(
                "AI Provider is missing in the request.".to_string(),
            ));
        }
    };

    if !config.is_supported(provider) {
        return Err(GatewayError::ValidationFailed(format!(
            "Provider '{}' is not currently supported.",
            provider
        )));
    }

    if present(fields.text).is_none() {
        return Err(GatewayError::ValidationFailed(
            "Message content (msg) is missing.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), GatewayError>) -> String {
        match result {
            Err(GatewayError::ValidationFailed(msg)) => msg,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    fn complete() -> RequiredFields<'static> {
        RequiredFields {
            api_key: Some("k"),
            provider: Some("Gemini"),
            text: Some("Hello"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let config = ProviderConfig::default();
        assert_eq!(validate_request(&config, &complete()), Ok(()));
    }

    #[test]
    fn test_each_failure_has_distinct_message() {
        let config = ProviderConfig::default();

        let missing_key = RequiredFields { api_key: None, ..complete() };
        let missing_provider = RequiredFields { provider: Some(""), ..complete() };
        let unsupported = RequiredFields { provider: Some("OpenAI"), ..complete() };
        let missing_text = RequiredFields { text: Some(""), ..complete() };

        let messages = [
            message(validate_request(&config, &missing_key)),
            message(validate_request(&config, &missing_provider)),
            message(validate_request(&config, &unsupported)),
            message(validate_request(&config, &missing_text)),
        ];

        assert_eq!(messages[0], "API Key is missing in the request.");
        assert_eq!(messages[1], "AI Provider is missing in the request.");
        assert_eq!(messages[2], "Provider 'OpenAI' is not currently supported.");
        assert_eq!(messages[3], "Message content (msg) is missing.");
    }

    #[test]
    fn test_checks_run_in_order() {
        let config = ProviderConfig::default();

        // Everything missing: the API key is reported first.
        let empty = RequiredFields::default();
        assert_eq!(message(validate_request(&config, &empty)), "API Key is missing in the request.");

        // Unsupported provider wins over missing text.
        let fields = RequiredFields {
            api_key: Some("k"),
            provider: Some("Claude"),
            text: None,
        };
        assert_eq!(
            message(validate_request(&config, &fields)),
            "Provider 'Claude' is not currently supported."
        );
    }

    #[test]
    fn test_validation_status_is_bad_request() {
        let config = ProviderConfig::default();
        let err = validate_request(&config, &RequiredFields::default()).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_supported_set_comes_from_config() {
        let config = ProviderConfig {
            supported_providers: vec!["Gemini".to_string(), "OpenAI".to_string()],
            ..ProviderConfig::default()
        };
        let fields = RequiredFields {
            provider: Some("OpenAI"),
            ..complete()
        };
        assert!(validate_request(&config, &fields).is_ok());
    }
}
