//! Resize geometry
//!
//! Pure, integer-exact planning for the three resize modes. Aspect ratios are
//! compared by cross-multiplication and scaled extents are floored, so a plan
//! depends only on its inputs.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    fn ensure_positive(&self, what: &str) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::geometry(format!(
                "{} must be positive, got {}x{}",
                what, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Fit inside the box, optionally padded
    FitWithinPadded,
    /// Overflow the box, then crop a centered window
    FitWithinExactCropped,
    /// Stretch to the box
    ScaleExact,
}

/// How a padded fit sizes its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Canvas is `(w + 2*posX, h + 2*posY)`. Can exceed the requested box.
    #[default]
    Enlarge,
    /// Canvas is exactly the requested box.
    ExactBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub canvas: Size,
    pub offset: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlan {
    pub resample: Size,
    pub padding: Option<Padding>,
}

impl FitPlan {
    pub fn output(&self) -> Size {
        self.padding.map_or(self.resample, |p| p.canvas)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub resample: Size,
    pub window: Rect,
}

impl CropPlan {
    pub fn output(&self) -> Size {
        self.window.size()
    }
}

/// floor(a * b / c), at least 1
fn scale(a: u32, b: u32, c: u32) -> u32 {
    let v = a as u64 * b as u64 / c as u64;
    v.clamp(1, u32::MAX as u64) as u32
}

/// True when the source is narrower (relative to its height) than the box.
fn narrower_than(source: Size, target: Size) -> bool {
    (source.width as u64 * target.height as u64) < (target.width as u64 * source.height as u64)
}

/// `extent + 2 * border`, refusing to overflow
fn padded_extent(extent: u32, border: u32) -> Result<u32> {
    border
        .checked_mul(2)
        .and_then(|b| extent.checked_add(b))
        .ok_or_else(|| {
            RenderError::geometry(format!("padded canvas {} + 2*{} overflows", extent, border))
        })
}

/// Scale so the source fits inside `target`, touching it on the binding axis.
pub fn plan_fit_within(
    source: Size,
    target: Size,
    padding: bool,
    policy: PaddingPolicy,
) -> Result<FitPlan> {
    source.ensure_positive("source dimensions")?;
    target.ensure_positive("target dimensions")?;

    let resample = if narrower_than(source, target) {
        Size::new(scale(target.height, source.width, source.height), target.height)
    } else {
        Size::new(target.width, scale(target.width, source.height, source.width))
    };

    let padding = if padding {
        let offset = Point {
            x: target.width.saturating_sub(resample.width) / 2,
            y: target.height.saturating_sub(resample.height) / 2,
        };
        let canvas = match policy {
            PaddingPolicy::Enlarge => Size::new(
                padded_extent(target.width, offset.x)?,
                padded_extent(target.height, offset.y)?,
            ),
            PaddingPolicy::ExactBox => target,
        };
        Some(Padding { canvas, offset })
    } else {
        None
    };

    Ok(FitPlan { resample, padding })
}

/// Scale so the source covers `target`, then crop the centered window.
pub fn plan_fit_within_exact(source: Size, target: Size) -> Result<CropPlan> {
    source.ensure_positive("source dimensions")?;
    target.ensure_positive("target dimensions")?;

    let resample = if narrower_than(source, target) {
        Size::new(
            target.width,
            scale(target.width, source.height, source.width).max(target.height),
        )
    } else {
        Size::new(
            scale(target.height, source.width, source.height).max(target.width),
            target.height,
        )
    };

    let window = Rect {
        x: (resample.width - target.width) / 2,
        y: (resample.height - target.height) / 2,
        width: target.width,
        height: target.height,
    };

    Ok(CropPlan { resample, window })
}

pub fn plan_scale_to(target: Size) -> Result<Size> {
    target.ensure_positive("target dimensions")?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(
        source: (u32, u32),
        target: (u32, u32),
        padding: bool,
        policy: PaddingPolicy,
    ) -> FitPlan {
        plan_fit_within(
            Size::new(source.0, source.1),
            Size::new(target.0, target.1),
            padding,
            policy,
        )
        .unwrap()
    }

    fn point(x: u32, y: u32) -> Point {
        Point { x, y }
    }

    fn exact(source: (u32, u32), target: (u32, u32)) -> CropPlan {
        plan_fit_within_exact(Size::new(source.0, source.1), Size::new(target.0, target.1)).unwrap()
    }

    #[test]
    fn test_landscape_into_square_binds_width() {
        let plan = fit((800, 600), (400, 400), false, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(400, 300));
        assert_eq!(plan.output(), Size::new(400, 300));
    }

    #[test]
    fn test_portrait_into_square_binds_height() {
        let plan = fit((300, 600), (200, 200), false, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(100, 200));
    }

    #[test]
    fn test_padding_enlarges_canvas() {
        let plan = fit((800, 600), (400, 400), true, PaddingPolicy::Enlarge);
        let padding = plan.padding.unwrap();
        assert_eq!(padding.offset, point(0, 50));
        assert_eq!(padding.canvas, Size::new(400, 500));
    }

    #[test]
    fn test_padding_portrait_widens_canvas() {
        let plan = fit((300, 600), (400, 400), true, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(200, 400));
        let padding = plan.padding.unwrap();
        assert_eq!(padding.offset, point(100, 0));
        assert_eq!(padding.canvas, Size::new(600, 400));
    }

    #[test]
    fn test_padding_odd_leftover_floors() {
        // 67 px left over: posX floors to 33
        let plan = fit((100, 300), (100, 100), true, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(33, 100));
        let padding = plan.padding.unwrap();
        assert_eq!(padding.offset, point(33, 0));
        assert_eq!(padding.canvas, Size::new(166, 100));

        let boxed = fit((100, 300), (100, 100), true, PaddingPolicy::ExactBox);
        assert_eq!(boxed.padding.unwrap().offset, point(33, 0));
        assert_eq!(boxed.output(), Size::new(100, 100));
    }

    #[test]
    fn test_padding_exact_box() {
        let plan = fit((800, 600), (400, 400), true, PaddingPolicy::ExactBox);
        assert_eq!(plan.output(), Size::new(400, 400));
        assert_eq!(plan.padding.unwrap().offset, point(0, 50));
    }

    #[test]
    fn test_padding_overflow_rejected() {
        let err = plan_fit_within(
            Size::new(1, 1_000_000),
            Size::new(u32::MAX, 10),
            true,
            PaddingPolicy::Enlarge,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Geometry(_)));
    }

    #[test]
    fn test_equal_aspect_binds_width() {
        let plan = fit((640, 480), (320, 240), true, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(320, 240));
        assert_eq!(plan.output(), Size::new(320, 240));
    }

    #[test]
    fn test_upscale_allowed() {
        let plan = fit((10, 20), (100, 100), false, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(50, 100));
    }

    #[test]
    fn test_sliver_clamped_to_one_pixel() {
        let plan = fit((10_000, 1), (100, 100), false, PaddingPolicy::Enlarge);
        assert_eq!(plan.resample, Size::new(100, 1));
    }

    #[test]
    fn test_exact_square_into_landscape() {
        let plan = exact((400, 400), (800, 600));
        assert_eq!(plan.resample, Size::new(800, 800));
        assert_eq!(
            plan.window,
            Rect {
                x: 0,
                y: 100,
                width: 800,
                height: 600
            }
        );
        assert_eq!(plan.output(), Size::new(800, 600));
    }

    #[test]
    fn test_exact_landscape_into_square() {
        let plan = exact((800, 600), (300, 300));
        assert_eq!(plan.resample, Size::new(400, 300));
        assert_eq!(
            plan.window,
            Rect {
                x: 50,
                y: 0,
                width: 300,
                height: 300
            }
        );
    }

    #[test]
    fn test_exact_odd_remainder_floors() {
        let plan = exact((333, 100), (100, 100));
        assert_eq!(plan.resample, Size::new(333, 100));
        assert_eq!(plan.window.x, 116);
    }

    #[test]
    fn test_exact_thin_source_overflows_far() {
        let plan = exact((1, 20_000), (200, 200));
        assert_eq!(plan.resample, Size::new(200, 4_000_000));
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = plan_fit_within(
            Size::new(100, 0),
            Size::new(10, 10),
            false,
            PaddingPolicy::Enlarge,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Geometry(_)));
        assert!(plan_fit_within_exact(Size::new(10, 10), Size::new(0, 10)).is_err());
        assert!(plan_scale_to(Size::new(5, 0)).is_err());
    }
}
