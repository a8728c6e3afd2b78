//! Runware REST client.
//!
//! Runware accepts a JSON array of tasks on a single endpoint. Every request
//! carries an `authentication` task followed by one `imageInference` task;
//! the response echoes each task's UUID on the items it produced.

use async_trait::async_trait;
use runware_mcp_common::config::Config;
use runware_mcp_common::error::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Task type of text-to-image requests and their results.
pub const IMAGE_INFERENCE_TASK: &str = "imageInference";

/// Upstream image generation backend.
///
/// The adapter only depends on this trait, so it can be exercised without a
/// live credential.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submit one inference request and return the generated images in
    /// upstream order.
    async fn request_images(&self, request: &ImageInferenceRequest) -> Result<Vec<GeneratedImage>, Error>;
}

/// How Runware should deliver generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputType {
    /// Hosted image URL
    #[default]
    #[serde(rename = "URL")]
    Url,
}

/// An `imageInference` task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInferenceRequest {
    /// Client-generated task identifier, echoed back on results
    #[serde(rename = "taskUUID")]
    pub task_uuid: String,
    /// Text prompt
    pub positive_prompt: String,
    /// Runware model AIR identifier
    pub model: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of images to generate
    pub number_results: u32,
    /// Delivery format
    pub output_type: OutputType,
}

/// One generated image descriptor as returned by Runware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Task type that produced this item
    #[serde(default)]
    pub task_type: Option<String>,
    /// Task identifier this item belongs to
    #[serde(default, rename = "taskUUID")]
    pub task_uuid: Option<String>,
    /// Upstream identifier of the image
    #[serde(default, rename = "imageUUID")]
    pub image_uuid: Option<String>,
    /// Hosted image URL, absent when delivery failed
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
}

/// Task envelope sent in the request array.
#[derive(Serialize)]
#[serde(tag = "taskType", rename_all = "camelCase")]
enum Task<'a> {
    Authentication {
        #[serde(rename = "apiKey")]
        api_key: &'a str,
    },
    ImageInference(&'a ImageInferenceRequest),
}

#[derive(Debug, Deserialize)]
struct RunwareResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
    #[serde(default)]
    errors: Vec<RunwareApiError>,
}

#[derive(Debug, Deserialize)]
struct RunwareApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RunwareResponse {
    fn first_error_message(&self) -> Option<String> {
        self.errors.first().map(|e| {
            e.message
                .clone()
                .or_else(|| e.code.clone())
                .unwrap_or_else(|| "Unknown Runware error".to_string())
        })
    }
}

/// `reqwest`-backed Runware client.
pub struct RunwareClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl RunwareClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: config.base_url.clone(),
        }
    }

    /// The REST endpoint requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for RunwareClient {
    #[instrument(level = "debug", name = "runware_request_images", skip_all, fields(task_uuid = %request.task_uuid))]
    async fn request_images(&self, request: &ImageInferenceRequest) -> Result<Vec<GeneratedImage>, Error> {
        let tasks = [
            Task::Authentication {
                api_key: &self.api_key,
            },
            Task::ImageInference(request),
        ];

        debug!(endpoint = %self.endpoint, "Calling Runware API");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&tasks)
            .send()
            .await
            .map_err(|e| Error::api(&self.endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::api(&self.endpoint, status.as_u16(), format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<RunwareResponse>(&body)
                .ok()
                .and_then(|r| r.first_error_message())
                .unwrap_or(body);
            return Err(Error::api(&self.endpoint, status.as_u16(), message));
        }

        let parsed: RunwareResponse = serde_json::from_str(&body)?;

        if let Some(message) = parsed.first_error_message() {
            return Err(Error::api(&self.endpoint, status.as_u16(), message));
        }

        let images: Vec<GeneratedImage> = parsed
            .data
            .into_iter()
            .filter(|item| {
                item.task_type.as_deref().is_none_or(|t| t == IMAGE_INFERENCE_TASK)
                    && item.task_uuid.as_deref().is_none_or(|id| id == request.task_uuid)
            })
            .collect();

        debug!(count = images.len(), "Received images from Runware");
        Ok(images)
    }
}
