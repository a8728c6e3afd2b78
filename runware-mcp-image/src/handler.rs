//! Image generation handler for the Runware MCP server.
//!
//! This module turns one `generateImage` call into one Runware
//! `imageInference` task and classifies the outcome into either the first
//! image's URL or a [`GenerationError`].

use std::sync::Arc;

use runware_mcp_common::config::Config;
use runware_mcp_common::error::{Error, GenerationError};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::{GeneratedImage, ImageGenerator, ImageInferenceRequest, OutputType, RunwareClient};

/// Runware model used for every request.
pub const DEFAULT_MODEL: &str = "runware:97@3";

/// Width used when the caller does not supply one.
pub const DEFAULT_WIDTH: u32 = 1024;

/// Height used when the caller does not supply one.
pub const DEFAULT_HEIGHT: u32 = 1024;

/// Images requested per call. Only the first is ever returned.
pub const NUMBER_RESULTS: u32 = 1;

/// Text-to-image generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ImageGenerateParams {
    /// Text prompt describing the image to generate
    pub prompt: String,

    /// Image width in pixels (default: 1024)
    #[serde(default, deserialize_with = "whole_pixels", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<u32>")]
    pub width: Option<u32>,

    /// Image height in pixels (default: 1024)
    #[serde(default, deserialize_with = "whole_pixels", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<u32>")]
    pub height: Option<u32>,
}

/// Accepts any whole, non-negative JSON number (`512` or `512.0`) as a pixel size.
fn whole_pixels<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return Err(de::Error::custom(format!(
            "expected a whole number of pixels, got {}",
            value
        )));
    }
    Ok(Some(value as u32))
}

impl ImageGenerateParams {
    /// Create parameters for a prompt with default dimensions.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: None,
            height: None,
        }
    }

    /// Width to request upstream.
    pub fn resolved_width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    /// Height to request upstream.
    pub fn resolved_height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    /// Build the upstream inference task for these parameters.
    pub fn to_inference_request(&self, task_uuid: impl Into<String>) -> ImageInferenceRequest {
        ImageInferenceRequest {
            task_uuid: task_uuid.into(),
            positive_prompt: self.prompt.clone(),
            model: DEFAULT_MODEL.to_string(),
            width: self.resolved_width(),
            height: self.resolved_height(),
            number_results: NUMBER_RESULTS,
            output_type: OutputType::Url,
        }
    }
}

/// Successful generation result; also the tool's output schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ImageGenerateResult {
    /// URL of the generated image
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

/// Pick the image to return from an upstream result set.
///
/// Only the first image counts; any further images are discarded.
pub fn select_first_image(images: Vec<GeneratedImage>) -> Result<ImageGenerateResult, GenerationError> {
    let first = images.into_iter().next().ok_or(GenerationError::NoImages)?;

    let image_url = first
        .image_url
        .filter(|url| !url.trim().is_empty())
        .ok_or(GenerationError::MissingUrl)?;

    Ok(ImageGenerateResult { image_url })
}

/// Image generation handler.
///
/// Stateless apart from the shared, read-only upstream client; cloning is an
/// `Arc` clone.
#[derive(Clone)]
pub struct ImageHandler {
    generator: Arc<dyn ImageGenerator>,
}

impl ImageHandler {
    /// Create a handler backed by the Runware REST API.
    pub fn new(config: &Config) -> Self {
        Self::with_generator(Arc::new(RunwareClient::new(config)))
    }

    /// Create a handler around any upstream implementation.
    pub fn with_generator(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    /// Generate one image from a text prompt.
    ///
    /// # Errors
    /// - `GenerationError::Upstream` if the Runware call fails
    /// - `GenerationError::NoImages` if Runware returns no images
    /// - `GenerationError::MissingUrl` if the first image has no URL
    #[instrument(
        level = "info",
        name = "generate_image",
        skip(self, params),
        fields(width = params.resolved_width(), height = params.resolved_height())
    )]
    pub async fn generate_image(&self, params: ImageGenerateParams) -> Result<ImageGenerateResult, GenerationError> {
        let request = params.to_inference_request(Uuid::new_v4().to_string());
        info!(task_uuid = %request.task_uuid, model = %request.model, "Requesting image from Runware");

        let outcome = match self.generator.request_images(&request).await {
            Ok(images) => select_first_image(images),
            Err(e) => Err(GenerationError::Upstream(e)),
        };

        match &outcome {
            Ok(result) => info!(image_url = %result.image_url, "Image generated"),
            Err(GenerationError::Upstream(Error::Api { endpoint, status_code, message })) => {
                warn!(%endpoint, status_code, "Image generation failed: {}", message)
            }
            Err(e) => warn!(error = ?e, "Image generation failed: {}", e),
        }

        outcome
    }
}
