//! Colour space conversion for perceptually even colour blending.
//!
//! Colours arrive gamma-encoded as 8-bit sRGB. Blending happens in an
//! approximately linear working space (gamma 2: `sqrt` on the way in, square on
//! the way out), which is cheap and avoids the muddy midpoints of blending
//! encoded values directly. Alpha is already linear and passes through.

use palette::{LinSrgba, Mix, Srgba};

/// Gamma-encoded 8-bit RGBA colour.
pub type Colourb = Srgba<u8>;

/// Colour in the linear working space, components in `[0, 1]`.
pub type Colourf = LinSrgba<f32>;

/// Convert an encoded colour into the linear working space.
pub fn colour_to_linear_space(c: Colourb) -> Colourf {
    LinSrgba::new(
        (c.red as f32 / 255.0).sqrt(),
        (c.green as f32 / 255.0).sqrt(),
        (c.blue as f32 / 255.0).sqrt(),
        c.alpha as f32 / 255.0,
    )
}

/// Convert a working-space colour back to 8-bit, clamping each channel.
pub fn colour_from_linear_space(c: Colourf) -> Colourb {
    Srgba::new(
        to_byte(c.red * c.red),
        to_byte(c.green * c.green),
        to_byte(c.blue * c.blue),
        to_byte(c.alpha),
    )
}

/// Blend two encoded colours through the linear working space.
pub fn mix_colours(c0: Colourb, c1: Colourb, alpha: f32) -> Colourb {
    let from = colour_to_linear_space(c0);
    let to = colour_to_linear_space(c1);
    colour_from_linear_space(from.mix(to, alpha.clamp(0.0, 1.0)))
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
