use image::{Rgba, RgbaImage};

use crate::error::{Result, TintError};

/// Fractional bits kept in the blend coefficients.
const PRECISION_BITS: u32 = 7;

/// Fast `x / 255` for values that fit the coefficient range.
#[inline]
fn div255(x: u32) -> u32 {
    ((x >> 8) + x) >> 8
}

/// Blend one overlay pixel over one base pixel.
///
/// Integer arithmetic on the 0..=255 scale with rounded divisions:
/// `out_a = o_a + b_a * (1 - o_a)` and each color channel is the
/// alpha-weighted mix divided back by `out_a`.
pub fn blend_pixel(base: Rgba<u8>, overlay: Rgba<u8>) -> Rgba<u8> {
    let [br, bg, bb, ba] = base.0.map(u32::from);
    let [or, og, ob, oa] = overlay.0.map(u32::from);

    if oa == 0 {
        return base;
    }

    let blend = ba * (255 - oa);
    let out_a255 = oa * 255 + blend;

    let coef1 = oa * 255 * 255 * (1 << PRECISION_BITS) / out_a255;
    let coef2 = 255 * (1 << PRECISION_BITS) - coef1;
    let round = 0x80 << PRECISION_BITS;

    let channel = |o: u32, b: u32| (div255(o * coef1 + b * coef2 + round) >> PRECISION_BITS) as u8;

    Rgba([
        channel(or, br),
        channel(og, bg),
        channel(ob, bb),
        div255(out_a255 + 0x80) as u8,
    ])
}

/// Composite `overlay` over `base`, returning a new image.
///
/// Both images must have the same dimensions.
pub fn alpha_composite(base: &RgbaImage, overlay: &RgbaImage) -> Result<RgbaImage> {
    if base.dimensions() != overlay.dimensions() {
        return Err(TintError::DimensionMismatch {
            base: base.dimensions(),
            overlay: overlay.dimensions(),
        });
    }

    Ok(RgbaImage::from_fn(base.width(), base.height(), |x, y| {
        blend_pixel(*base.get_pixel(x, y), *overlay.get_pixel(x, y))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(alpha: u8) -> RgbaImage {
        RgbaImage::from_fn(5, 4, |x, y| {
            Rgba([(x * 50) as u8, (y * 80) as u8, 255 - (x * y * 10) as u8, alpha])
        })
    }

    #[test]
    fn test_transparent_overlay_returns_base() {
        let base = RgbaImage::from_fn(5, 4, |x, y| {
            Rgba([(x * 13) as u8, 200, (y * 31) as u8, (x * 40 + y * 7) as u8])
        });
        let overlay = RgbaImage::from_pixel(5, 4, Rgba([255, 0, 255, 0]));

        let result = alpha_composite(&base, &overlay).unwrap();
        assert_eq!(result, base);
    }

    #[test]
    fn test_opaque_overlay_replaces_base() {
        let base = RgbaImage::from_pixel(5, 4, Rgba([10, 20, 30, 90]));
        let overlay = gradient(255);

        let result = alpha_composite(&base, &overlay).unwrap();
        assert_eq!(result, overlay);
    }

    #[test]
    fn test_half_alpha_over_opaque() {
        let base = Rgba([0, 0, 255, 255]);
        let overlay = Rgba([255, 0, 0, 128]);

        let out = blend_pixel(base, overlay);
        assert_eq!(out.0, [128, 0, 127, 255]);
    }

    #[test]
    fn test_over_transparent_base_keeps_overlay() {
        let base = Rgba([0, 0, 0, 0]);
        let overlay = Rgba([200, 100, 50, 128]);

        assert_eq!(blend_pixel(base, overlay), overlay);
    }

    #[test]
    fn test_transparent_over_transparent_keeps_base_color() {
        let base = Rgba([13, 200, 31, 0]);
        let overlay = Rgba([255, 0, 255, 0]);

        assert_eq!(blend_pixel(base, overlay), base);
    }

    #[test]
    fn test_alpha_accumulates() {
        // 0.5 over 0.5 -> 0.75
        let out = blend_pixel(Rgba([0, 0, 0, 128]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 192);
    }

    #[test]
    fn test_dimension_mismatch() {
        let base = RgbaImage::new(4, 4);
        let overlay = RgbaImage::new(4, 5);

        let err = alpha_composite(&base, &overlay).unwrap_err();
        assert!(matches!(
            err,
            TintError::DimensionMismatch {
                base: (4, 4),
                overlay: (4, 5)
            }
        ));
    }

    #[test]
    fn test_inputs_untouched() {
        let base = gradient(200);
        let overlay = gradient(60);
        let (base_before, overlay_before) = (base.clone(), overlay.clone());

        alpha_composite(&base, &overlay).unwrap();
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }
}
