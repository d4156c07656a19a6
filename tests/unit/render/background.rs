use super::*;
use crate::direction::palette::default_palette;
use crate::render::recording::{DrawCmd, RecordingCanvas};

fn frame(title: Option<&str>, beat: f64, progress: f64, now_ms: f64) -> BackgroundFrame<'_> {
    BackgroundFrame {
        title,
        beat,
        progress,
        now_ms,
    }
}

#[test]
fn first_frame_draws() {
    let mut g = BackgroundGate::new(100.0);
    assert_eq!(g.poll(&frame(None, 0.0, 0.0, 0.0)), Some(RedrawReason::First));
    assert_eq!(g.poll(&frame(None, 0.0, 0.0, 16.0)), None);
}

#[test]
fn title_change_redraws_immediately() {
    let mut g = BackgroundGate::new(100.0);
    g.poll(&frame(Some("Intro"), 0.1, 0.0, 0.0));
    assert_eq!(
        g.poll(&frame(Some("Verse"), 0.1, 0.0, 1.0)),
        Some(RedrawReason::TitleChanged)
    );
}

#[test]
fn drift_needs_time_and_movement() {
    let mut g = BackgroundGate::new(100.0);
    g.poll(&frame(None, 0.5, 0.10, 0.0));
    // Big beat move but too soon.
    assert_eq!(g.check(&frame(None, 0.9, 0.10, 50.0)), None);
    // Enough time, too little movement.
    assert_eq!(g.check(&frame(None, 0.6, 0.12, 500.0)), None);
    assert_eq!(g.check(&frame(None, 0.9, 0.10, 150.0)), Some(RedrawReason::Drift));
    assert_eq!(g.check(&frame(None, 0.5, 0.20, 150.0)), Some(RedrawReason::Drift));
}

#[test]
fn beat_crossing_redraws_regardless_of_time() {
    let mut g = BackgroundGate::new(100.0);
    g.poll(&frame(None, 0.15, 0.0, 0.0));
    assert_eq!(g.poll(&frame(None, 0.25, 0.0, 5.0)), Some(RedrawReason::BeatCrossing));
    assert_eq!(g.poll(&frame(None, 0.19, 0.0, 10.0)), Some(RedrawReason::BeatCrossing));
    assert_eq!(g.poll(&frame(None, 0.1, 0.0, 15.0)), None);
}

#[test]
fn reset_forces_redraw() {
    let mut g = BackgroundGate::new(100.0);
    g.poll(&frame(None, 0.0, 0.0, 0.0));
    g.reset();
    assert_eq!(g.poll(&frame(None, 0.0, 0.0, 1.0)), Some(RedrawReason::First));
}

#[test]
fn every_system_clears_then_fills() {
    let roles = PaletteRoles::from_palette(&default_palette());
    for system in [
        BackgroundSystem::Default,
        BackgroundSystem::Fire,
        BackgroundSystem::Ocean,
        BackgroundSystem::Storm,
        BackgroundSystem::Aurora,
        BackgroundSystem::Urban,
        BackgroundSystem::Intimate,
        BackgroundSystem::Void,
    ] {
        let mut c = RecordingCanvas::new(320.0, 180.0);
        draw_background(&mut c, system, &roles, 0.9, 0.5, 3.0);
        assert_eq!(c.commands().first(), Some(&DrawCmd::Clear), "{system:?}");
        assert!(c.draw_count() >= 2, "{system:?}");
    }
}

#[test]
fn background_is_deterministic() {
    let roles = PaletteRoles::from_palette(&default_palette());
    let mut a = RecordingCanvas::new(320.0, 180.0);
    let mut b = RecordingCanvas::new(320.0, 180.0);
    draw_background(&mut a, BackgroundSystem::Storm, &roles, 0.8, 0.3, 12.5);
    draw_background(&mut b, BackgroundSystem::Storm, &roles, 0.8, 0.3, 12.5);
    assert_eq!(a.commands(), b.commands());
}

#[test]
fn empty_canvas_only_clears() {
    let roles = PaletteRoles::from_palette(&default_palette());
    let mut c = RecordingCanvas::new(0.0, 0.0);
    draw_background(&mut c, BackgroundSystem::Fire, &roles, 1.0, 1.0, 1.0);
    assert_eq!(c.draw_count(), 0);
}
