use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{LyricDanceError, LyricDanceResult};
use crate::foundation::math::mul_div255_u8;

/// Source-over for one premultiplied pixel, with an extra layer opacity.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul, opacity: f32) -> Rgba8Premul {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src.a == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src.a), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);
    let blend = |s: u8, d: u8| {
        mul_div255_u8(u16::from(s), op).saturating_add(mul_div255_u8(u16::from(d), inv))
    };

    Rgba8Premul {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: sa.saturating_add(mul_div255_u8(u16::from(dst.a), inv)),
    }
}

/// Source-over of a whole premultiplied RGBA8 buffer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> LyricDanceResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LyricDanceError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over(
            Rgba8Premul { r: d[0], g: d[1], b: d[2], a: d[3] },
            Rgba8Premul { r: s[0], g: s[1], b: s[2], a: s[3] },
            opacity,
        );
        d.copy_from_slice(&out.to_array());
    }
    Ok(())
}

/// Flatten layers bottom to top into one premultiplied RGBA8 frame.
///
/// Every layer must be `width × height × 4` bytes.
pub fn composite_layers(width: u32, height: u32, layers: &[&[u8]]) -> LyricDanceResult<Vec<u8>> {
    let len = width as usize * height as usize * 4;
    let mut out = vec![0u8; len];
    for (i, layer) in layers.iter().enumerate() {
        if layer.len() != len {
            return Err(LyricDanceError::render(format!(
                "layer {i} has {} bytes, expected {len}",
                layer.len()
            )));
        }
        over_in_place(&mut out, layer, 1.0)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
