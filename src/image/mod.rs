//! Image-generation capability and durable blob relay.

pub mod config;
pub mod openai;
pub mod relay;
pub mod types;

pub use relay::{BlobRelay, RelayError};
pub use types::{GeneratedImage, ImageError, ImageGeneration, ImageSize};
