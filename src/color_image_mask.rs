use image::{Rgba, RgbaImage};

/// Multiply every pixel of an overlay by a tint color, preserving transparency.
///
/// Each color channel becomes `channel * tint / 255`, truncated. Alpha is
/// copied as is.
pub fn tint_image(img: &RgbaImage, color: (u8, u8, u8)) -> RgbaImage {
    let (r_tint, g_tint, b_tint) = color;

    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        Rgba([
            (r as u16 * r_tint as u16 / 255) as u8,
            (g as u16 * g_tint as u16 / 255) as u8,
            (b as u16 * b_tint as u16 / 255) as u8,
            a,
        ])
    })
}
