//! MCP Server implementation for the Runware image server.
//!
//! Exposes a single `generateImage` tool. Every well-formed call returns a
//! tool result; generation failures are reported as error-flagged results
//! rather than protocol errors.

use crate::handler::{ImageGenerateParams, ImageGenerateResult, ImageHandler};
use runware_mcp_common::config::Config;
use runware_mcp_common::error::GenerationError;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, Implementation, ListToolsResult, ServerCapabilities, ServerInfo,
        Tool,
    },
};
use schemars::JsonSchema;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

/// Name the server reports during initialization.
pub const SERVER_NAME: &str = "imagen-runware-server";

/// Version the server reports during initialization.
pub const SERVER_VERSION: &str = "1.0.0";

/// Name of the image generation tool.
pub const GENERATE_IMAGE_TOOL: &str = "generateImage";

/// Normalized outcome of one `generateImage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResponse {
    /// An image was generated
    Success {
        /// URL of the first generated image
        image_url: String,
    },
    /// Generation failed for the given reason
    Failure {
        /// Human-readable reason, without the `Error: ` prefix
        message: String,
    },
}

impl ToolResponse {
    /// Whether this response carries an image.
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success { .. })
    }
}

impl From<Result<ImageGenerateResult, GenerationError>> for ToolResponse {
    fn from(outcome: Result<ImageGenerateResult, GenerationError>) -> Self {
        match outcome {
            Ok(result) => ToolResponse::Success {
                image_url: result.image_url,
            },
            Err(e) => ToolResponse::Failure {
                message: e.to_string(),
            },
        }
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        match response {
            ToolResponse::Success { image_url } => {
                let structured = serde_json::json!({ "imageURL": image_url });
                CallToolResult {
                    content: vec![Content::text(image_url)],
                    structured_content: Some(structured),
                    is_error: Some(false),
                    meta: None,
                }
            }
            ToolResponse::Failure { message } => {
                CallToolResult::error(vec![Content::text(format!("Error: {}", message))])
            }
        }
    }
}

/// MCP Server for image generation.
#[derive(Clone)]
pub struct ImageServer {
    handler: ImageHandler,
}

impl ImageServer {
    /// Create a new ImageServer backed by the Runware API.
    pub fn new(config: Config) -> Self {
        Self::with_handler(ImageHandler::new(&config))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self { handler }
    }

    /// Generate an image and wrap the outcome as a tool result.
    pub async fn generate_image(&self, params: ImageGenerateParams) -> CallToolResult {
        info!(prompt = %params.prompt, "Generating image");

        let response = ToolResponse::from(self.handler.generate_image(params).await);
        response.into()
    }
}

fn schema_object<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

/// Tool definition for `generateImage`.
pub fn generate_image_tool() -> Tool {
    Tool {
        name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
        title: Some("Generate Image".to_string()),
        description: Some(Cow::Borrowed("Generate image from text prompt using Runware")),
        input_schema: schema_object::<ImageGenerateParams>(),
        output_schema: Some(schema_object::<ImageGenerateResult>()),
        annotations: None,
        icons: None,
        meta: None,
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Image generation server backed by the Runware API. \
                 Use generateImage with a text prompt (and optional width/height, \
                 default 1024x1024) to get the URL of a generated image."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing tools");
            Ok(ListToolsResult {
                tools: vec![generate_image_tool()],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                GENERATE_IMAGE_TOOL => {
                    let tool_params: ImageGenerateParams = params
                        .arguments
                        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
                        .transpose()
                        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
                        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))?;

                    Ok(self.generate_image(tool_params).await)
                }
                _ => Err(McpError::invalid_params(format!("Unknown tool: {}", params.name), None)),
            }
        }
    }
}
