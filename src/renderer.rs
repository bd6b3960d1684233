//! Image Renderer - Single Entry Point
//!
//! Every operation reads and decodes the source once, plans the geometry,
//! transforms through the codec and writes the result atomically.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::codec::{Codec, PixelBuffer, RasterCodec, ResampleFilter};
use crate::config::{RenderLimits, RendererConfig};
use crate::error::{RenderError, Result};
use crate::format::RasterFormat;
use crate::geometry::{
    plan_fit_within, plan_fit_within_exact, plan_scale_to, PaddingPolicy, Point, Rect,
    ResizeMode, Size,
};
use crate::hashing::sha256_hex;
use crate::placeholder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: RasterFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
    /// Only meaningful for `FitWithinPadded`
    #[serde(default)]
    pub padding: bool,
    /// Output type; the source's type when absent
    #[serde(default)]
    pub format: Option<RasterFormat>,
}

impl TargetSpec {
    pub fn new(width: u32, height: u32, mode: ResizeMode) -> Self {
        Self {
            width,
            height,
            mode,
            padding: false,
            format: None,
        }
    }

    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_format(mut self, format: RasterFormat) -> Self {
        self.format = Some(format);
        self
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: RasterFormat,
    pub bytes: usize,
    pub digest: String,
}

/// An encoded render held in memory
#[derive(Debug, Clone)]
pub struct Rendered {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: RasterFormat,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub filter: ResampleFilter,
    pub background: Rgba<u8>,
    pub padding_policy: PaddingPolicy,
    pub limits: RenderLimits,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RendererConfig::default())
    }
}

impl From<&RendererConfig> for RenderOptions {
    fn from(config: &RendererConfig) -> Self {
        Self {
            filter: config.filter,
            background: Rgba(config.background),
            padding_policy: config.padding_policy,
            limits: config.limits.clone(),
        }
    }
}

/// Renders one source image into resized outputs
pub struct ImageRenderer<C: Codec = RasterCodec> {
    source: PathBuf,
    codec: C,
    options: RenderOptions,
}

impl ImageRenderer<RasterCodec> {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self::with_codec(source, RasterCodec::new(), RenderOptions::default())
    }
}

impl<C: Codec> ImageRenderer<C> {
    pub fn with_codec(source: impl Into<PathBuf>, codec: C, options: RenderOptions) -> Self {
        Self {
            source: source.into(),
            codec,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_filter(&mut self, filter: ResampleFilter) {
        self.options.filter = filter;
    }

    /// Read the source's dimensions and type
    pub fn inspect(&self) -> Result<SourceImage> {
        let (source, _) = self.load_source()?;
        Ok(source)
    }

    /// Scale to fit within `w`x`h`, optionally padding around the result
    pub fn fit_within(&self, output: &Path, w: u32, h: u32, padding: bool) -> Result<RenderResult> {
        let target = TargetSpec::new(w, h, ResizeMode::FitWithinPadded).with_padding(padding);
        self.render(output, &target)
    }

    /// Scale to cover `w`x`h` and crop the centered window. Output is exactly `w`x`h`.
    pub fn fit_within_exact(&self, output: &Path, w: u32, h: u32) -> Result<RenderResult> {
        self.render(output, &TargetSpec::new(w, h, ResizeMode::FitWithinExactCropped))
    }

    /// Scale to exactly `w`x`h` without preserving the aspect ratio
    pub fn scale_to(&self, output: &Path, w: u32, h: u32) -> Result<RenderResult> {
        self.render(output, &TargetSpec::new(w, h, ResizeMode::ScaleExact))
    }

    pub fn render_not_found(&self, w: u32, h: u32) -> Result<Vec<u8>> {
        placeholder::render_not_found_with(&self.codec, w, h)
    }

    pub fn render(&self, output: &Path, target: &TargetSpec) -> Result<RenderResult> {
        let rendered = self.render_to_bytes(target)?;
        write_atomic(output, &rendered.data)?;

        info!(
            output = %output.display(),
            width = rendered.width,
            height = rendered.height,
            format = %rendered.format,
            "rendered image"
        );

        Ok(RenderResult {
            output_path: output.to_path_buf(),
            width: rendered.width,
            height: rendered.height,
            format: rendered.format,
            bytes: rendered.data.len(),
            digest: sha256_hex(&rendered.data),
        })
    }

    pub fn render_to_bytes(&self, target: &TargetSpec) -> Result<Rendered> {
        self.options.limits.check_target(target.size())?;
        let (source, pixels) = self.load_source()?;
        let format = target.format.unwrap_or(source.format);
        let source_size = Size::new(source.width, source.height);

        let image = match target.mode {
            ResizeMode::FitWithinPadded => self.fit(&pixels, source_size, target)?,
            ResizeMode::FitWithinExactCropped => self.fit_exact(&pixels, source_size, target)?,
            ResizeMode::ScaleExact => {
                let size = plan_scale_to(target.size())?;
                self.options.limits.check_resample(size)?;
                self.codec.resample(&pixels, size, self.options.filter)
            }
        };

        let data = self.codec.encode(&image, format)?;
        Ok(Rendered {
            data,
            width: image.width(),
            height: image.height(),
            format,
        })
    }

    fn fit(&self, pixels: &PixelBuffer, source: Size, target: &TargetSpec) -> Result<PixelBuffer> {
        let policy = self.options.padding_policy;
        let plan = plan_fit_within(source, target.size(), target.padding, policy)?;
        debug!(?plan, "fit within");
        self.options.limits.check_resample(plan.resample)?;
        if let Some(padding) = plan.padding {
            self.options.limits.check_resample(padding.canvas)?;
        }

        let resampled = self.codec.resample(pixels, plan.resample, self.options.filter);
        let Some(padding) = plan.padding else {
            return Ok(resampled);
        };

        let canvas = PixelBuffer::from_pixel(
            padding.canvas.width,
            padding.canvas.height,
            self.options.background,
        );
        let window = Rect {
            x: 0,
            y: 0,
            width: plan.resample.width,
            height: plan.resample.height,
        };
        Ok(self.codec.composite(canvas, &resampled, padding.offset, window))
    }

    fn fit_exact(
        &self,
        pixels: &PixelBuffer,
        source: Size,
        target: &TargetSpec,
    ) -> Result<PixelBuffer> {
        let plan = plan_fit_within_exact(source, target.size())?;
        debug!(?plan, "fit within exact");
        self.options.limits.check_resample(plan.resample)?;

        let resampled = self.codec.resample(pixels, plan.resample, self.options.filter);
        let canvas = PixelBuffer::from_pixel(
            plan.window.width,
            plan.window.height,
            self.options.background,
        );
        Ok(self.codec.composite(canvas, &resampled, Point::default(), plan.window))
    }

    fn load_source(&self) -> Result<(SourceImage, PixelBuffer)> {
        let bytes = fs::read(&self.source).map_err(|e| RenderError::SourceRead {
            path: self.source.clone(),
            source: e,
        })?;
        let decoded = self.codec.decode(&bytes)?;
        let size = decoded.size();
        self.options.limits.check_source(size)?;

        let source = SourceImage {
            path: self.source.clone(),
            width: size.width,
            height: size.height,
            format: decoded.format,
        };
        debug!(?source, "loaded source");
        Ok((source, decoded.pixels))
    }
}

/// Write through a temp file in the same directory, then rename into place.
fn write_atomic(output: &Path, data: &[u8]) -> Result<()> {
    let write_err = |source| RenderError::Write {
        path: output.to_path_buf(),
        source,
    };

    let file_name = output
        .file_name()
        .ok_or_else(|| write_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path has no file name",
        )))?
        .to_string_lossy();
    let temp = output.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    if let Err(e) = fs::write(&temp, data).and_then(|_| fs::rename(&temp, output)) {
        let _ = fs::remove_file(&temp);
        return Err(write_err(e));
    }
    Ok(())
}
