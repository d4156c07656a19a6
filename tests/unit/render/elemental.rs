use super::*;
use crate::render::recording::{DrawCmd, RecordingCanvas};

fn word(class: ElementalClass, beat: f64) -> ElementalWord<'static> {
    ElementalWord {
        text: "spark",
        x: 200.0,
        y: 150.0,
        font_size: 40.0,
        word_width: 120.0,
        class,
        time: 3.25,
        beat_intensity: beat,
        appearance_count: 1,
        color_override: None,
        is_hero: true,
    }
}

fn record(w: &ElementalWord<'_>, opts: &ElementalOptions) -> RecordingCanvas {
    let mut c = RecordingCanvas::new(400.0, 300.0);
    draw_elemental_word(&mut c, w, opts);
    c
}

fn circles(c: &RecordingCanvas) -> usize {
    c.commands()
        .iter()
        .filter(|cmd| matches!(cmd, DrawCmd::FillCircle { .. }))
        .count()
}

#[test]
fn parse_and_default_association() {
    assert_eq!(ElementalClass::parse(" FIRE "), ElementalClass::Fire);
    assert_eq!(ElementalClass::parse("lava"), ElementalClass::None);
    assert_eq!(elemental_for_word("Burning!"), ElementalClass::Fire);
    assert_eq!(elemental_for_word("tears"), ElementalClass::Rain);
    assert_eq!(elemental_for_word("waves"), ElementalClass::Water);
    assert_eq!(elemental_for_word("ghost"), ElementalClass::Smoke);
    assert_eq!(elemental_for_word("neon"), ElementalClass::Electric);
    assert_eq!(elemental_for_word("table"), ElementalClass::None);
}

#[test]
fn electric_glow_grows_with_beat() {
    let (r_hi, a_hi) = electric_glow(40.0, 0.8, true);
    let (r_lo, a_lo) = electric_glow(40.0, 0.1, true);
    assert!(r_hi > r_lo);
    assert!(a_hi > a_lo);

    let hi = record(&word(ElementalClass::Electric, 0.8), &ElementalOptions::default());
    let lo = record(&word(ElementalClass::Electric, 0.1), &ElementalOptions::default());
    let glow_hi = hi.radial_fills().next().unwrap();
    let glow_lo = lo.radial_fills().next().unwrap();
    assert!(glow_hi.radius > glow_lo.radius);
    assert!(glow_hi.stops[0].color.a > glow_lo.stops[0].color.a);
}

#[test]
fn lightning_only_above_threshold() {
    let strokes = |beat| {
        record(&word(ElementalClass::Electric, beat), &ElementalOptions::default())
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCmd::StrokePath(_)))
            .count()
    };
    assert_eq!(strokes(0.5), 0);
    assert_eq!(strokes(0.9), 1);
}

#[test]
fn same_inputs_draw_the_same_frame() {
    for class in [
        ElementalClass::Water,
        ElementalClass::Rain,
        ElementalClass::Fire,
        ElementalClass::Smoke,
        ElementalClass::Neon,
        ElementalClass::None,
    ] {
        let a = record(&word(class, 0.7), &ElementalOptions::default());
        let b = record(&word(class, 0.7), &ElementalOptions::default());
        assert_eq!(a.commands(), b.commands(), "{class:?}");
        assert!(a.draw_count() > 0);
    }
}

#[test]
fn bubble_counts_follow_appearances_and_quality() {
    let mut w = word(ElementalClass::Water, 0.0);
    w.appearance_count = 2;
    // 3 + 2×2 bubbles plus 2 drips.
    assert_eq!(circles(&record(&w, &ElementalOptions::default())), 7 + 2);

    w.appearance_count = 40;
    assert_eq!(circles(&record(&w, &ElementalOptions::default())), 12 + 2);
    let low = ElementalOptions {
        effect_quality: EffectQuality::Low,
        ..Default::default()
    };
    assert_eq!(circles(&record(&w, &low)), 8 + 1);

    let fixed = ElementalOptions {
        bubble_positions: vec![0.1, 0.5, 0.9],
        ..Default::default()
    };
    assert_eq!(circles(&record(&w, &fixed)), 3 + 2);
}

#[test]
fn offscreen_words_are_culled() {
    let opts = ElementalOptions {
        cull_to: Some(CanvasSize::new(400, 300)),
        ..Default::default()
    };
    let mut w = word(ElementalClass::Fire, 0.5);
    w.x = -1000.0;
    assert!(record(&w, &opts).commands().is_empty());
    w.x = 200.0;
    assert!(!record(&w, &opts).commands().is_empty());
}

#[test]
fn degenerate_inputs_draw_nothing() {
    let mut w = word(ElementalClass::Fire, 0.5);
    w.font_size = 0.0;
    assert!(record(&w, &ElementalOptions::default()).commands().is_empty());
    let mut empty = RecordingCanvas::new(0.0, 0.0);
    draw_elemental_word(&mut empty, &word(ElementalClass::Fire, 0.5), &ElementalOptions::default());
    assert!(empty.commands().is_empty());
}
