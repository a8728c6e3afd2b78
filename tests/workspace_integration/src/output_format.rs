//! Output format tests.
//!
//! Success results carry the URL as text plus `{"imageURL": ...}` structured
//! content; failure results carry `Error: <message>` text and are flagged as
//! errors.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
pub fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() {
        return Err("Result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    match (result.is_error, &result.structured_content) {
        (Some(true), Some(_)) => Err("Error results should not carry structured content".to_string()),
        (Some(false), None) | (None, None) => {
            Err("Successful results should carry structured content".to_string())
        }
        _ => Ok(()),
    }
}

/// Validates that a Content item has valid structure.
pub fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) if text_content.text.is_empty() => {
            Err("Text content should not be empty".to_string())
        }
        RawContent::Text(_) => Ok(()),
        other => Err(format!("Only text content is expected, got {:?}", other)),
    }
}

/// Text of the first content block, if any.
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|c| c.as_text()).map(|t| t.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runware_mcp_image::ToolResponse;

    #[test]
    fn test_success_result_is_valid() {
        let result: CallToolResult = ToolResponse::Success {
            image_url: "https://x/1.png".to_string(),
        }
        .into();
        validate_tool_result(&result).unwrap();
        assert_eq!(first_text(&result), Some("https://x/1.png"));
    }

    #[test]
    fn test_failure_result_is_valid() {
        let result: CallToolResult = ToolResponse::Failure {
            message: "Generated image has no URL".to_string(),
        }
        .into();
        validate_tool_result(&result).unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), Some("Error: Generated image has no URL"));
    }

    #[test]
    fn test_empty_content_fails_validation() {
        let result = CallToolResult {
            content: vec![],
            is_error: Some(false),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&result).is_err());
    }

    #[test]
    fn test_error_with_structured_content_fails_validation() {
        let result = CallToolResult {
            content: vec![Content::text("Error: boom")],
            is_error: Some(true),
            meta: None,
            structured_content: Some(serde_json::json!({"imageURL": "x"})),
        };
        assert!(validate_tool_result(&result).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use runware_mcp_image::ToolResponse;

    fn url_strategy() -> impl Strategy<Value = String> {
        "https://im\\.runware\\.ai/image/ws/[0-9]\\.[0-9]/[a-z0-9-]{8,36}\\.(png|jpg|webp)"
    }

    fn message_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 .,:()]{1,120}"
    }

    proptest! {
        /// Any URL round-trips into both the text block and `imageURL`.
        #[test]
        fn success_envelope_carries_url(url in url_strategy()) {
            let result: CallToolResult = ToolResponse::Success { image_url: url.clone() }.into();

            prop_assert!(validate_tool_result(&result).is_ok());
            prop_assert_eq!(result.is_error, Some(false));
            prop_assert_eq!(first_text(&result), Some(url.as_str()));
            prop_assert_eq!(
                result.structured_content,
                Some(serde_json::json!({ "imageURL": url }))
            );
        }

        /// Any failure message is prefixed with `Error: ` and flagged.
        #[test]
        fn failure_envelope_carries_message(message in message_strategy()) {
            let result: CallToolResult = ToolResponse::Failure { message: message.clone() }.into();

            prop_assert!(validate_tool_result(&result).is_ok());
            prop_assert_eq!(result.is_error, Some(true));
            let expected = format!("Error: {}", message);
            prop_assert_eq!(first_text(&result), Some(expected.as_str()));
        }
    }
}
