//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be a valid absolute URL).
    #[validate(
        length(min = 1, message = "URL is required"),
        url(message = "Invalid URL format")
    )]
    pub url: String,
}

/// Response carrying the assigned short code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_passes() {
        let request = ShortenRequest {
            url: "https://example.com/page".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        let request = ShortenRequest { url: String::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_relative_url_rejected() {
        let request = ShortenRequest {
            url: "example.com/page".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = ShortenResponse {
            short_code: "AbCd12_-".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["shortCode"], "AbCd12_-");
    }
}
