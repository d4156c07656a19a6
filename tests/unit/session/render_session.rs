use super::*;
use crate::model::beat::BeatGrid;
use crate::model::lyrics::LyricLine;
use crate::render::recording::RecordingCanvas;
use serde_json::json;

fn song() -> SongInput {
    SongInput::new(
        180.0,
        vec![LyricLine::new(10.0, 12.0, "we rise up")],
        BeatGrid::regular(120.0, 180.0),
    )
}

struct Layers {
    bg: RecordingCanvas,
    mid: RecordingCanvas,
    text: RecordingCanvas,
}

impl Layers {
    fn new() -> Self {
        Self {
            bg: RecordingCanvas::new(640.0, 360.0),
            mid: RecordingCanvas::new(640.0, 360.0),
            text: RecordingCanvas::new(640.0, 360.0),
        }
    }

    fn render(&mut self, s: &mut RenderSession, t: f64, delta_ms: Option<f64>) -> DrawStats {
        let mut layers = FrameLayers {
            background: &mut self.bg,
            particles: &mut self.mid,
            text: &mut self.text,
        };
        s.render_frame_timed(t, delta_ms, &mut layers)
    }

    fn take(&mut self) {
        self.bg.take();
        self.mid.take();
        self.text.take();
    }
}

#[test]
fn minimal_song_renders_default_treatment() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let sections = s.sections();
    assert!(!sections.is_empty());
    assert_eq!(sections[0].start_sec, 0.0);
    assert_eq!(sections[sections.len() - 1].end_sec, 180.0);

    let mut l = Layers::new();
    let stats = l.render(&mut s, 11.0, None);
    assert!(stats.background_redrawn);
    assert_eq!(stats.words, 3);
    assert!(stats.particles > 0);
    let texts: Vec<&str> = l.text.texts().collect();
    assert!(texts.contains(&"we"));
    assert!(texts.contains(&"up"));
    // "rise" moves, so it leaves three ghosts behind the glyph.
    assert_eq!(texts.iter().filter(|t| **t == "rise").count(), 4);
    assert_eq!(
        stats.draw_calls,
        (l.bg.draw_count() + l.mid.draw_count() + l.text.draw_count()) as u64
    );
}

#[test]
fn background_redraw_is_gated() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    assert!(l.render(&mut s, 30.0, None).background_redrawn);
    l.take();
    let again = l.render(&mut s, 30.0, None);
    assert!(!again.background_redrawn);
    assert_eq!(l.bg.draw_count(), 0);
}

#[test]
fn idle_frames_are_quieter() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    let idle = l.render(&mut s, 5.0, None);
    let active = l.render(&mut s, 11.0, None);
    assert_eq!(idle.words, 0);
    assert!(idle.particles * 4 < active.particles, "{idle:?} vs {active:?}");
}

#[test]
fn slow_frames_throttle_the_budget() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    let mut last = l.render(&mut s, 0.0, None);
    assert_eq!(last.budget, 200);
    for i in 1..=10 {
        l.take();
        last = l.render(&mut s, f64::from(i) * 0.03, Some(30.0));
    }
    assert_eq!(last.budget, 100);
    assert_eq!(s.particle_budget(), 100);
    for i in 11..=20 {
        l.take();
        last = l.render(&mut s, f64::from(i) * 0.03, Some(16.0));
    }
    assert_eq!(last.budget, 200);
}

#[test]
fn words_are_recorded_once_per_line_activation() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    for t in [10.5, 11.0, 11.5] {
        l.render(&mut s, t, None);
        l.take();
    }
    assert_eq!(s.word_history().count("rise"), 1);

    // Seeking back replays the line from a clean history.
    l.render(&mut s, 10.2, None);
    assert_eq!(s.word_history().count("rise"), 1);
}

#[test]
fn hud_can_be_disabled() {
    let opts = RenderSessionOpts {
        show_hud: false,
        ..RenderSessionOpts::default()
    };
    let mut with = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut without = RenderSession::new(song(), opts).unwrap();
    let (mut a, mut b) = (Layers::new(), Layers::new());
    let sa = a.render(&mut with, 50.0, None);
    let sb = b.render(&mut without, 50.0, None);
    assert_eq!(sa.draw_calls, sb.draw_calls + 3);
}

#[test]
fn direction_change_forces_background_redraw() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    l.render(&mut s, 30.0, None);
    let direction: CinematicDirection = serde_json::from_value(json!({
        "chapters": [{"title": "Ignition", "startRatio": 0.0, "endRatio": 1.0,
                      "backgroundDirective": "burning city"}]
    }))
    .unwrap();
    s.set_direction(direction);
    l.take();
    let stats = l.render(&mut s, 30.0, None);
    assert!(stats.background_redrawn);
    assert_eq!(
        s.interpreter().background_system(30.0 / 180.0),
        BackgroundSystem::Fire
    );
}

#[test]
fn elemental_words_draw_their_treatment() {
    let mut input = SongInput::new(
        60.0,
        vec![LyricLine::new(1.0, 4.0, "into the fire")],
        BeatGrid::regular(100.0, 60.0),
    );
    input.system = Some("paper".to_owned());
    let mut s = RenderSession::new(input, RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    let stats = l.render(&mut s, 3.0, None);
    assert_eq!(stats.words, 3);
    // Fire draws the dark glyph and the clipped gradient pass.
    assert_eq!(l.text.texts().filter(|t| *t == "fire").count(), 2);
    assert!(
        l.text
            .commands()
            .iter()
            .any(|c| matches!(c, crate::render::recording::DrawCmd::ClipRect(_)))
    );
}

#[test]
fn evolution_overlay_follows_repeats() {
    let mut input = SongInput::new(
        60.0,
        vec![
            LyricLine::new(1.0, 3.0, "glow"),
            LyricLine::new(4.0, 6.0, "glow"),
        ],
        BeatGrid::default(),
    );
    input.direction = serde_json::from_value(json!({
        "wordDirectives": [{"word": "glow", "evolutionRule": "expand its aura"}]
    }))
    .unwrap();
    let mut s = RenderSession::new(input, RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    l.render(&mut s, 2.0, None);
    l.take();
    l.render(&mut s, 5.0, None);
    assert_eq!(s.word_history().count("glow"), 2);
    let strokes = l
        .text
        .commands()
        .iter()
        .filter(|c| matches!(c, crate::render::recording::DrawCmd::StrokePath(_)))
        .count();
    assert_eq!(strokes, 1);
}

#[test]
fn reset_clears_playback_state() {
    let mut s = RenderSession::new(song(), RenderSessionOpts::default()).unwrap();
    let mut l = Layers::new();
    l.render(&mut s, 11.0, None);
    s.reset();
    assert!(s.word_history().is_empty());
    l.take();
    assert!(l.render(&mut s, 11.0, None).background_redrawn);
}

#[test]
fn invalid_song_is_rejected() {
    let mut bad = song();
    bad.duration_sec = f64::NAN;
    assert!(RenderSession::new(bad, RenderSessionOpts::default()).is_err());
}

fn directed(duration: f64, lines: Vec<LyricLine>, direction: serde_json::Value) -> SongInput {
    let mut input = SongInput::new(duration, lines, BeatGrid::default());
    input.direction = serde_json::from_value(direction).unwrap();
    input
}

#[test]
fn chapter_edge_inside_a_memo_bucket_switches_the_look() {
    let chapters = json!({"chapters": [
        {"title": "Embers", "startRatio": 0.0, "endRatio": 0.33,
         "backgroundDirective": "burning city"},
        {"title": "Tide", "startRatio": 0.33, "endRatio": 1.0,
         "backgroundDirective": "ocean waves"}
    ]});
    let mut s = RenderSession::new(
        directed(100.0, Vec::new(), chapters),
        RenderSessionOpts::default(),
    )
    .unwrap();
    let mut l = Layers::new();
    l.render(&mut s, 32.0, None);
    l.take();
    assert!(l.render(&mut s, 34.0, None).background_redrawn);
    assert_eq!(s.interpreter().background_system(0.34), BackgroundSystem::Ocean);

    let mut ocean = RenderSession::new(
        directed(100.0, Vec::new(), json!({"backgroundSystem": "ocean"})),
        RenderSessionOpts::default(),
    )
    .unwrap();
    let mut reference = Layers::new();
    reference.render(&mut ocean, 34.0, None);
    assert_eq!(l.bg.commands(), reference.bg.commands());
}

#[test]
fn climax_moment_draws_more_particles() {
    let line = || vec![LyricLine::new(60.0, 80.0, "we rise")];
    let mut climax = RenderSession::new(
        directed(
            100.0,
            line(),
            json!({"emotionalArc": "slow-burn", "climax": {"timeRatio": 0.7}}),
        ),
        RenderSessionOpts::default(),
    )
    .unwrap();
    let mut calm = RenderSession::new(
        directed(100.0, line(), json!({"emotionalArc": "slow-burn"})),
        RenderSessionOpts::default(),
    )
    .unwrap();
    let (mut a, mut b) = (Layers::new(), Layers::new());
    let boosted = a.render(&mut climax, 70.0, None);
    let plain = b.render(&mut calm, 70.0, None);
    assert!(climax.interpreter().is_climax_moment(0.7));
    assert!(!calm.interpreter().is_climax_moment(0.7));
    assert!(
        boosted.particles > plain.particles,
        "{boosted:?} vs {plain:?}"
    );
}
