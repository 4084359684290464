//! Image pipeline stages.
//!
//! - **validate**: Pre-decode checks (existence, size, magic bytes)
//! - **decode**: Load and decode images with dimension limits
//! - **normalize**: Narrow exotic pixel layouts to 8-bit
//! - **color**: Alpha compositing and per-container finalization
//! - **encode**: Encode JPEG / PNG / WebP
//! - **paths**: Output path derivation and collision handling
//! - **discovery**: Expand directory inputs into file lists
//! - **channel**: Bounded event channel for the batch runner

pub mod channel;
pub mod color;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod normalize;
pub mod paths;
pub mod validate;

// Re-exports for convenient access
pub use color::{finalize_for, flatten_on_white};
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use encode::ImageEncoder;
pub use normalize::{normalize, PixelMode};
pub use paths::{OutputDirectoryPolicy, OutputPathResolver, RenameRule, TargetExtension};
pub use validate::Validator;
