//! Resize layout computation.
//!
//! Two modes, both downscale-only:
//!
//! | crop  | behaviour                                                      |
//! |-------|----------------------------------------------------------------|
//! | false | fit inside the box, keep aspect ratio                          |
//! | true  | centre-crop to the box's aspect ratio, then scale to the box   |
//!
//! A zero box dimension is unconstrained. When the source already fits the
//! box there is nothing to do and [`plan`] returns `None`.

use image::DynamicImage;
use image::imageops::FilterType;

use crate::sizes::SizeDefinition;

/// Region of the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Planned resize: optional source crop, then scale to `width` x `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub crop: Option<Rect>,
    pub width: u32,
    pub height: u32,
}

/// Compute the layout for a source of `src_w` x `src_h`.
pub fn plan(src_w: u32, src_h: u32, size: &SizeDefinition) -> Option<Layout> {
    if src_w == 0 || src_h == 0 || !size.constrains() {
        return None;
    }

    let layout = if size.crop {
        crop_layout(src_w, src_h, size.width, size.height)
    } else {
        fit_layout(src_w, src_h, size.width, size.height)
    };

    // Same size or larger would be an upscale (or a no-op)
    if layout.width >= src_w && layout.height >= src_h {
        return None;
    }
    Some(layout)
}

/// Apply a planned layout.
pub fn apply(image: DynamicImage, layout: &Layout) -> DynamicImage {
    let image = match layout.crop {
        Some(rect) => image.crop_imm(rect.x, rect.y, rect.width, rect.height),
        None => image,
    };
    image.resize_exact(layout.width, layout.height, FilterType::Lanczos3)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_layout(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> Layout {
    let axis_ratio = |src: u32, max: u32| {
        if max > 0 && src > max {
            f64::from(max) / f64::from(src)
        } else {
            1.0
        }
    };
    let ratio = axis_ratio(src_w, max_w).min(axis_ratio(src_h, max_h));

    let mut width = ((f64::from(src_w) * ratio).round() as u32).max(1);
    let mut height = ((f64::from(src_h) * ratio).round() as u32).max(1);
    if max_w > 0 {
        width = width.min(max_w);
    }
    if max_h > 0 {
        height = height.min(max_h);
    }

    Layout {
        crop: None,
        width,
        height,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn crop_layout(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> Layout {
    let aspect = f64::from(src_w) / f64::from(src_h);

    let mut width = box_w.min(src_w);
    let mut height = box_h.min(src_h);
    if width == 0 {
        width = (f64::from(height) * aspect).round() as u32;
    }
    if height == 0 {
        height = (f64::from(width) / aspect).round() as u32;
    }
    let width = width.clamp(1, src_w);
    let height = height.clamp(1, src_h);

    // Scale at which the output covers the crop region
    let ratio = (f64::from(width) / f64::from(src_w)).max(f64::from(height) / f64::from(src_h));
    let crop_w = ((f64::from(width) / ratio).round() as u32).clamp(1, src_w);
    let crop_h = ((f64::from(height) / ratio).round() as u32).clamp(1, src_h);

    Layout {
        crop: Some(Rect {
            x: (src_w - crop_w) / 2,
            y: (src_h - crop_h) / 2,
            width: crop_w,
            height: crop_h,
        }),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32, crop: bool) -> SizeDefinition {
        SizeDefinition::new("test", width, height, crop)
    }

    #[test]
    fn test_zero_box_is_no_resize() {
        assert_eq!(plan(800, 600, &size(0, 0, false)), None);
        assert_eq!(plan(800, 600, &size(0, 0, true)), None);
    }

    #[test]
    fn test_fit_inside_box() {
        let layout = plan(800, 600, &size(300, 300, false)).unwrap();
        assert_eq!((layout.width, layout.height), (300, 225));
        assert!(layout.crop.is_none());
    }

    #[test]
    fn test_fit_width_only() {
        let layout = plan(1600, 900, &size(768, 0, false)).unwrap();
        assert_eq!((layout.width, layout.height), (768, 432));
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(plan(200, 100, &size(1024, 1024, false)), None);
        assert_eq!(plan(300, 300, &size(300, 300, false)), None);
    }

    #[test]
    fn test_crop_square_from_landscape() {
        let layout = plan(800, 600, &size(150, 150, true)).unwrap();
        assert_eq!((layout.width, layout.height), (150, 150));
        assert_eq!(
            layout.crop,
            Some(Rect {
                x: 100,
                y: 0,
                width: 600,
                height: 600
            })
        );
    }

    #[test]
    fn test_crop_small_source_only_crops() {
        // Narrower than the box: keep full width, crop height to the box
        let layout = plan(100, 300, &size(150, 150, true)).unwrap();
        assert_eq!((layout.width, layout.height), (100, 150));
        let crop = layout.crop.unwrap();
        assert_eq!((crop.width, crop.height, crop.y), (100, 150, 75));
    }

    #[test]
    fn test_crop_output_bounded() {
        for (w, h) in [(1, 1), (37, 999), (4000, 3), (640, 480), (151, 149)] {
            if let Some(layout) = plan(w, h, &size(150, 150, true)) {
                assert!(layout.width <= w.min(150));
                assert!(layout.height <= h.min(150));
                let crop = layout.crop.unwrap();
                assert!(crop.x + crop.width <= w);
                assert!(crop.y + crop.height <= h);
            }
        }
    }

    #[test]
    fn test_apply_dimensions() {
        let image = DynamicImage::new_rgb8(800, 600);
        let layout = plan(800, 600, &size(150, 150, true)).unwrap();
        let out = apply(image, &layout);
        assert_eq!((out.width(), out.height()), (150, 150));
    }
}
