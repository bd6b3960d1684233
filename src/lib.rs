//! PartKeepr Imaging - part image renderer
//!
//! Resizes uploaded part images for display:
//! 1. Fit within a box, optionally padded
//! 2. Fit exactly, cropping the overflow
//! 3. Scale to a box, ignoring the aspect ratio
//!
//! plus a deterministic "image not found" placeholder. Pixel work goes through
//! an injected [`Codec`].

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod hashing;
pub mod placeholder;
pub mod presets;
pub mod renderer;

pub use codec::{Codec, PixelBuffer, RasterCodec, ResampleFilter};
pub use config::{RenderLimits, RendererConfig};
pub use error::{RenderError, Result};
pub use format::RasterFormat;
pub use geometry::{PaddingPolicy, ResizeMode, Size};
pub use placeholder::{not_found_image, render_not_found};
pub use presets::{Preset, PresetRegistry};
pub use renderer::{ImageRenderer, RenderOptions, RenderResult, Rendered, SourceImage, TargetSpec};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
