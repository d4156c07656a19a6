/// Trig-based pseudo noise in `0..1`, a pure function of `(x, salt)`.
pub(crate) fn trig_noise(x: f64, salt: f64) -> f64 {
    let v = (x * 12.9898 + salt * 78.233).sin() * 43_758.545_3;
    v - v.floor()
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Positive fractional part (`fract` that stays in `0..1` for negative input).
pub(crate) fn fract01(x: f64) -> f64 {
    x - x.floor()
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Median of a slice (`0` for empty input). Does not require sorted input.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) * 0.5
    } else {
        v[mid]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
