use super::*;

#[test]
fn props_are_deterministic() {
    let anim = LineAnim::default();
    let a = word_visual_props("burning", 2, &anim, 0.4, 2);
    let b = word_visual_props("burning", 2, &anim, 0.4, 2);
    assert_eq!(a, b);
    assert!((a.delay - 0.12).abs() < 1e-12);
}

#[test]
fn motion_words_get_a_trail() {
    let p = word_visual_props("rise", 1, &LineAnim::default(), 0.0, 1);
    assert!(p.show_trail);
    assert_eq!(p.trail_count, 3);
    assert!(p.y_offset < 0.0);
    assert!(!word_visual_props("we", 0, &LineAnim::default(), 0.0, 1).show_trail);
}

#[test]
fn impact_is_big_and_warm() {
    let p = word_visual_props("FIRE!", 0, &LineAnim::default(), 0.0, 1);
    assert!(p.scale >= 1.15);
    assert!(p.color.r > p.color.b);
    assert!(p.y_offset > 0.0);
}

#[test]
fn repeated_words_dominate() {
    let anim = LineAnim::default();
    let p = word_visual_props("never", 0, &anim, 0.0, 4);
    assert_eq!(p.color, Color::WHITE);
    assert!(p.scale >= 1.3 * 0.95);
    assert!(p.glow_radius >= 12.0);
}

#[test]
fn repetition_boosts_scale() {
    let anim = LineAnim::default();
    let once = word_visual_props("xyzzy", 0, &anim, 0.0, 1);
    let twice = word_visual_props("xyzzy", 0, &anim, 0.0, 2);
    assert!((twice.scale / once.scale - 1.1).abs() < 1e-9);
}

#[test]
fn outputs_are_clamped() {
    let anim = LineAnim {
        scale: 50.0,
        opacity: 9.0,
        ..LineAnim::default()
    };
    let p = word_visual_props("blood", 0, &anim, f64::NAN, 1000);
    assert_eq!(p.scale, 2.0);
    assert_eq!(p.opacity, 1.0);
    let tiny = LineAnim {
        scale: 0.01,
        ..LineAnim::default()
    };
    assert_eq!(word_visual_props("not", 0, &tiny, 0.0, 1).scale, 0.5);
}

#[test]
fn beat_grows_scale() {
    let anim = LineAnim::default();
    let quiet = word_visual_props("xyzzy", 0, &anim, 0.0, 1);
    let loud = word_visual_props("xyzzy", 0, &anim, 1.0, 1);
    assert!(loud.scale > quiet.scale);
    assert!(loud.glow_radius > quiet.glow_radius);
}
