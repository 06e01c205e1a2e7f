//! Width/height pair with in-place scaling.
//!
//! All functions here are pure and testable without any I/O or images.
//! Scaling never fails: a zero-sized dimension simply scales to zero, so
//! callers that need a usable size must validate it upstream.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D size in pixels.
///
/// Scale operations mutate in place and return `&mut Self` so they can be
/// chained or used inline:
///
/// ```
/// # use imgnorm::imaging::Dimension;
/// let mut dim = Dimension::new(1600, 1200);
/// dim.scale_within(800, 0);
/// assert_eq!(dim, Dimension::new(800, 600));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Size of a decoded image. Saturates at `i32::MAX`.
    pub fn of(image: &DynamicImage) -> Self {
        image.dimensions().into()
    }

    /// Multiply both sides by `factor`, rounding each to the nearest pixel.
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        self.width = scale_side(self.width, factor);
        self.height = scale_side(self.height, factor);
        self
    }

    /// Scale by `factor`, shrinking the factor when the result would exceed
    /// `max_width` or `max_height`.
    ///
    /// A maximum of zero or less means "no limit" on that side. When a limit
    /// is hit the factor becomes the smallest of `max_height / height` and
    /// `max_width / width` among the active limits, so the aspect ratio is
    /// kept.
    pub fn scale_with_limits(&mut self, factor: f32, max_width: i32, max_height: i32) -> &mut Self {
        let exceeds_width = max_width > 0 && self.width as f32 * factor > max_width as f32;
        let exceeds_height = max_height > 0 && self.height as f32 * factor > max_height as f32;

        let factor = if exceeds_width || exceeds_height {
            let by_height = if max_height > 0 {
                max_height as f32 / self.height as f32
            } else {
                factor
            };
            let by_width = if max_width > 0 {
                max_width as f32 / self.width as f32
            } else {
                factor
            };
            by_height.min(by_width)
        } else {
            factor
        };

        self.scale(factor)
    }

    /// Fit inside a `max_width` x `max_height` box without enlarging.
    pub fn scale_within(&mut self, max_width: i32, max_height: i32) -> &mut Self {
        self.scale_with_limits(1.0, max_width, max_height)
    }

    /// `true` if either side is negative.
    pub fn is_negative(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// `true` if this size matches the image exactly.
    pub fn matches(&self, image: &DynamicImage) -> bool {
        let (w, h) = image.dimensions();
        i64::from(self.width) == i64::from(w) && i64::from(self.height) == i64::from(h)
    }
}

fn scale_side(side: i32, factor: f32) -> i32 {
    // NaN (0 * inf) casts to 0
    (side as f32 * factor).round() as i32
}

impl From<(u32, u32)> for Dimension {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // scale
    // =========================================================================

    #[test]
    fn scale_halves() {
        assert_eq!(*Dimension::new(800, 600).scale(0.5), Dimension::new(400, 300));
    }

    #[test]
    fn scale_rounds_to_nearest() {
        // 333 * 0.5 = 166.5 → 167, 101 * 0.5 = 50.5 → 51
        assert_eq!(*Dimension::new(333, 101).scale(0.5), Dimension::new(167, 51));
        // 10 * 0.33 = 3.3 → 3
        assert_eq!(*Dimension::new(10, 10).scale(0.33), Dimension::new(3, 3));
    }

    #[test]
    fn scale_is_chainable() {
        let mut dim = Dimension::new(100, 50);
        dim.scale(2.0).scale(0.25);
        assert_eq!(dim, Dimension::new(50, 25));
    }

    #[test]
    fn scale_zero_size_stays_zero() {
        assert_eq!(*Dimension::new(0, 0).scale(3.0), Dimension::new(0, 0));
    }

    // =========================================================================
    // scale_with_limits / scale_within
    // =========================================================================

    #[test]
    fn within_box_is_untouched() {
        assert_eq!(
            *Dimension::new(400, 300).scale_within(800, 600),
            Dimension::new(400, 300)
        );
    }

    #[test]
    fn width_limit_shrinks_landscape() {
        // factor = 800 / 1600 = 0.5
        assert_eq!(
            *Dimension::new(1600, 1200).scale_within(800, 800),
            Dimension::new(800, 600)
        );
    }

    #[test]
    fn height_limit_shrinks_portrait() {
        // factor = min(500/1000, 800/600) = 0.5
        assert_eq!(
            *Dimension::new(600, 1000).scale_within(800, 500),
            Dimension::new(300, 500)
        );
    }

    #[test]
    fn non_positive_limit_is_ignored() {
        assert_eq!(
            *Dimension::new(1600, 1200).scale_within(0, 300),
            Dimension::new(400, 300)
        );
        assert_eq!(
            *Dimension::new(1600, 1200).scale_within(400, -1),
            Dimension::new(400, 300)
        );
    }

    #[test]
    fn no_limits_keeps_factor() {
        assert_eq!(
            *Dimension::new(100, 80).scale_with_limits(2.0, 0, 0),
            Dimension::new(200, 160)
        );
    }

    #[test]
    fn factor_is_capped_by_limit() {
        // 2x would give 400x200, the 300 width limit wins → factor 1.5
        assert_eq!(
            *Dimension::new(200, 100).scale_with_limits(2.0, 300, 1000),
            Dimension::new(300, 150)
        );
    }

    #[test]
    fn zero_height_with_limit_is_deterministic() {
        let mut dim = Dimension::new(0, 0);
        dim.scale_within(10, 10);
        assert_eq!(dim, Dimension::new(0, 0));
    }

    #[test]
    fn display_and_conversions() {
        assert_eq!(Dimension::new(12, 34).to_string(), "12x34");
        assert_eq!(Dimension::from((7u32, 9u32)), Dimension::new(7, 9));
        assert_eq!(Dimension::from((u32::MAX, 1u32)).width, i32::MAX);
        assert!(Dimension::new(-1, 5).is_negative());
        assert!(!Dimension::new(0, 0).is_negative());
    }

    #[test]
    fn of_and_matches_image() {
        let img = DynamicImage::new_rgb8(40, 30);
        let dim = Dimension::of(&img);
        assert_eq!(dim, Dimension::new(40, 30));
        assert!(dim.matches(&img));
        assert!(!Dimension::new(30, 40).matches(&img));
    }

    proptest! {
        #[test]
        fn scale_rounds_each_side(w in 0i32..10_000, h in 0i32..10_000, factor in 0.01f32..10.0) {
            let mut dim = Dimension::new(w, h);
            dim.scale(factor);
            prop_assert_eq!(dim.width, (w as f32 * factor).round() as i32);
            prop_assert_eq!(dim.height, (h as f32 * factor).round() as i32);
            prop_assert!(!dim.is_negative());
        }

        #[test]
        fn scale_within_respects_active_limits(
            w in 1i32..10_000,
            h in 1i32..10_000,
            max_w in -10i32..5_000,
            max_h in -10i32..5_000,
        ) {
            let mut dim = Dimension::new(w, h);
            dim.scale_within(max_w, max_h);
            if max_w > 0 {
                prop_assert!(dim.width <= max_w, "{} > {}", dim.width, max_w);
            }
            if max_h > 0 {
                prop_assert!(dim.height <= max_h, "{} > {}", dim.height, max_h);
            }
        }

        #[test]
        fn scale_within_keeps_aspect_to_rounding(
            w in 1i32..10_000,
            h in 1i32..10_000,
            max_w in 1i32..5_000,
            max_h in 1i32..5_000,
        ) {
            let mut dim = Dimension::new(w, h);
            dim.scale_within(max_w, max_h);
            // new_w * h - new_h * w = e_w * h - e_h * w with |e| <= 1/2 plus float slack
            let skew = (i64::from(dim.width) * i64::from(h) - i64::from(dim.height) * i64::from(w)).abs();
            prop_assert!(skew <= i64::from(w) + i64::from(h));
        }
    }
}
