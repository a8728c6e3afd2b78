//! Runware MCP Image Server Library
//!
//! Exposes Runware text-to-image generation as the `generateImage` MCP tool.

pub mod client;
pub mod handler;
pub mod server;

pub use client::{GeneratedImage, ImageGenerator, ImageInferenceRequest, RunwareClient};
pub use handler::{ImageGenerateParams, ImageGenerateResult, ImageHandler};
pub use server::{ImageServer, ToolResponse};
