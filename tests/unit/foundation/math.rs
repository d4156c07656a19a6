use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn trig_noise_is_pure_and_bounded() {
    for i in 0..50 {
        let x = i as f64 * 0.37;
        let v = trig_noise(x, 1.5);
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v, trig_noise(x, 1.5));
    }
}

#[test]
fn helpers_guard_edges() {
    assert_eq!(fract01(-0.25), 0.75);
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
}
