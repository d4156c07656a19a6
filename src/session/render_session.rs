use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use crate::analysis::sections::{AudioSection, detect_sections};
use crate::direction::evolution::{EvolutionProps, draw_evolution_overlay};
use crate::direction::interpreter::DirectionInterpreter;
use crate::direction::palette::PaletteRoles;
use crate::direction::resolvers::{BackgroundSystem, MotionPhysics, TensionStage};
use crate::foundation::color::Color;
use crate::foundation::core::{CanvasSize, Point, progress_of};
use crate::foundation::error::LyricDanceResult;
use crate::foundation::math::trig_noise;
use crate::model::direction::CinematicDirection;
use crate::model::lyrics::{active_line_index, line_progress};
use crate::model::song::SongInput;
use crate::render::background::{BackgroundFrame, BackgroundGate, draw_background};
use crate::render::canvas::{Canvas2d, CountingCanvas, FontSpec, Paint};
use crate::render::elemental::{
    EffectQuality, ElementalClass, ElementalOptions, ElementalWord, draw_elemental_word,
};
use crate::render::governor::ParticleGovernor;
use crate::render::hud::draw_hud;
use crate::render::lighting::{LightMode, draw_lighting, lighting_intensity};
use crate::render::memo::BucketMemo;
use crate::render::particles::{ParticleConfig, draw_particles, particle_config, particle_count};
use crate::render::system_style::{LayoutMode, SystemStyle, compute_fit_font_size, system_style};
use crate::words::history::WordHistoryTracker;
use crate::words::props::{LineAnim, word_visual_props};

const IDLE_PARTICLE_FACTOR: f64 = 0.2;
const LINE_FADE_SEC: f64 = 0.2;
const WORD_FADE_SEC: f64 = 0.15;
const MAX_LINE_HEIGHT_RATIO: f64 = 0.3;
const MEMO_CAPACITY: usize = 8;
const EM_PX: f64 = 16.0;

/// Options controlling a [`RenderSession`].
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Particle tier for elemental words.
    pub effect_quality: EffectQuality,
    /// Particle budget while frames keep up.
    pub max_particles_high: usize,
    /// Particle budget while throttled.
    pub max_particles_low: usize,
    /// Frame delta above which a frame counts as slow.
    pub slow_frame_ms: f64,
    /// Slow frames needed to throttle.
    pub slow_frame_threshold: u32,
    /// Minimum time between drift-driven background redraws.
    pub background_redraw_ms: f64,
    /// Draw the playhead.
    pub show_hud: bool,
    /// Progress width of one memo bucket.
    pub memo_bucket: f64,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            effect_quality: EffectQuality::High,
            max_particles_high: 200,
            max_particles_low: 100,
            slow_frame_ms: 22.0,
            slow_frame_threshold: 10,
            background_redraw_ms: 100.0,
            show_hud: true,
            memo_bucket: 0.05,
        }
    }
}

/// What one frame cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrawStats {
    /// Fill, stroke and text calls across all layers.
    pub draw_calls: u64,
    /// Whether the background was redrawn.
    pub background_redrawn: bool,
    /// Ambient particles drawn.
    pub particles: usize,
    /// Words drawn.
    pub words: usize,
    /// Particle budget in force.
    pub budget: usize,
}

/// The three layers a frame draws into, back to front.
pub struct FrameLayers<'a> {
    /// Background and its light pass. Only cleared when the background is redrawn.
    pub background: &'a mut dyn Canvas2d,
    /// Ambient particles; cleared every frame.
    pub particles: &'a mut dyn Canvas2d,
    /// Lyrics, elemental overlays and HUD; cleared every frame.
    pub text: &'a mut dyn Canvas2d,
}

#[derive(Clone, Debug)]
struct FrameLook {
    stage: Option<TensionStage>,
    physics: MotionPhysics,
    background: BackgroundSystem,
    light: LightMode,
    particles: ParticleConfig,
}

fn compute_look(interp: &DirectionInterpreter, roles: &PaletteRoles, progress: f64) -> FrameLook {
    let physics = interp.motion_physics(progress);
    FrameLook {
        stage: interp.tension_stage(progress).cloned(),
        physics,
        background: interp.background_system(progress),
        light: LightMode::parse(interp.light_directive(progress)),
        particles: particle_config(interp.particle_directive(progress), &physics, roles),
    }
}

struct PlacedWord {
    key: String,
    display: String,
    x: f64,
    y: f64,
    size: f64,
    font: &'static str,
    weight: u16,
    color: Color,
    opacity: f64,
    glow: f64,
    trail: Option<(u32, f64, f64)>,
    class: ElementalClass,
    hero: bool,
    count: u32,
    evolution: EvolutionProps,
}

/// Renders a song frame by frame.
///
/// A session owns every piece of per-playback state: word history, background redraw gate,
/// particle governor, look memo and fitted font sizes. Build one per playing song; callers only
/// drive it through [`RenderSession::render_frame`].
pub struct RenderSession {
    song: SongInput,
    sections: Vec<AudioSection>,
    interp: DirectionInterpreter,
    roles: PaletteRoles,
    system: Option<SystemStyle>,
    opts: RenderSessionOpts,

    generation: u64,
    looks: BucketMemo<FrameLook>,
    fitted: HashMap<(usize, &'static str), f64>,
    viewport: Option<(f64, f64)>,
    background: BackgroundGate,
    governor: ParticleGovernor,
    history: WordHistoryTracker,
    last_line: Option<usize>,
    last_frame_at: Option<Instant>,
}

impl RenderSession {
    /// Prepare a session: validate the song, detect sections and interpret the direction.
    #[tracing::instrument(
        skip(song, opts),
        fields(lines = song.lines.len(), duration = song.duration_sec)
    )]
    pub fn new(song: SongInput, opts: RenderSessionOpts) -> LyricDanceResult<Self> {
        song.validate()?;
        let sections = detect_sections(
            &song.signature,
            &song.beat_grid,
            &song.lines,
            song.duration_sec,
        );
        let interp = DirectionInterpreter::with_palette(song.direction.clone(), &song.palette);
        let roles = PaletteRoles::from_palette(interp.palette());
        let system = named_system(&song, &interp);
        let governor = ParticleGovernor::new(
            opts.slow_frame_ms,
            opts.slow_frame_threshold,
            opts.max_particles_high,
            opts.max_particles_low,
        );
        tracing::debug!(sections = sections.len(), "render session ready");
        Ok(Self {
            sections,
            interp,
            roles,
            system,
            looks: BucketMemo::new(opts.memo_bucket, MEMO_CAPACITY),
            fitted: HashMap::new(),
            viewport: None,
            background: BackgroundGate::new(opts.background_redraw_ms),
            governor,
            history: WordHistoryTracker::new(),
            last_line: None,
            last_frame_at: None,
            generation: 0,
            song,
            opts,
        })
    }

    /// The song being rendered.
    pub fn song(&self) -> &SongInput {
        &self.song
    }

    /// Sections detected at load.
    pub fn sections(&self) -> &[AudioSection] {
        &self.sections
    }

    /// Direction in force.
    pub fn interpreter(&self) -> &DirectionInterpreter {
        &self.interp
    }

    /// Word appearances so far.
    pub fn word_history(&self) -> &WordHistoryTracker {
        &self.history
    }

    /// Particle budget currently in force.
    pub fn particle_budget(&self) -> usize {
        self.governor.budget()
    }

    /// Replace the song. Everything derived from the previous one is dropped.
    pub fn load_song(&mut self, song: SongInput) -> LyricDanceResult<()> {
        song.validate()?;
        self.sections = detect_sections(
            &song.signature,
            &song.beat_grid,
            &song.lines,
            song.duration_sec,
        );
        self.interp = DirectionInterpreter::with_palette(song.direction.clone(), &song.palette);
        self.roles = PaletteRoles::from_palette(self.interp.palette());
        self.system = named_system(&song, &self.interp);
        self.song = song;
        self.generation += 1;
        self.reset();
        Ok(())
    }

    /// Swap the direction document; memoized looks and evolution results are dropped.
    pub fn set_direction(&mut self, direction: CinematicDirection) {
        self.song.direction = direction.clone();
        self.interp = DirectionInterpreter::with_palette(direction, &self.song.palette);
        self.roles = PaletteRoles::from_palette(self.interp.palette());
        self.system = named_system(&self.song, &self.interp);
        self.looks.invalidate();
        self.fitted.clear();
        self.background.reset();
    }

    /// Drop size-dependent state after the layers change size.
    ///
    /// Also detected automatically from the text layer's size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Some((width, height));
        self.fitted.clear();
        self.background.reset();
    }

    /// Back to the state right after construction (same song and direction).
    pub fn reset(&mut self) {
        self.looks.invalidate();
        self.fitted.clear();
        self.background.reset();
        self.governor.reset();
        self.history.reset();
        self.interp.invalidate_evolution_cache();
        self.last_line = None;
        self.last_frame_at = None;
    }

    /// Render the frame at `time_sec`, timing the frame delta from the wall clock.
    pub fn render_frame(&mut self, time_sec: f64, layers: &mut FrameLayers<'_>) -> DrawStats {
        let now = Instant::now();
        let delta_ms = self
            .last_frame_at
            .map(|prev| now.duration_since(prev).as_secs_f64() * 1000.0);
        self.last_frame_at = Some(now);
        self.render_frame_timed(time_sec, delta_ms, layers)
    }

    /// Render the frame at `time_sec` with an explicit frame delta (`None` for the first frame).
    pub fn render_frame_timed(
        &mut self,
        time_sec: f64,
        frame_delta_ms: Option<f64>,
        layers: &mut FrameLayers<'_>,
    ) -> DrawStats {
        let duration = self.song.duration_sec;
        let t = if time_sec.is_finite() {
            time_sec.clamp(0.0, duration.max(0.0))
        } else {
            0.0
        };
        let size = (layers.text.width(), layers.text.height());
        if self.viewport != Some(size) {
            self.resize(size.0, size.1);
        }
        let budget = match frame_delta_ms {
            Some(ms) => self.governor.observe(ms),
            None => self.governor.budget(),
        };
        if self.history.observe_time(t) {
            self.last_line = None;
        }

        let progress = progress_of(t, duration);
        let beat = self.song.beat_grid.intensity_at(t);
        let fingerprint = self.interp.fingerprint();
        let span = self.interp.stable_span(progress);
        let look = self
            .looks
            .get_or_insert_with(progress, span, fingerprint, self.generation, |p| {
                compute_look(&self.interp, &self.roles, p)
            })
            .clone();
        let active = active_line_index(&self.song.lines, t);

        let mut background = CountingCanvas::new(&mut *layers.background);
        let mut particles = CountingCanvas::new(&mut *layers.particles);
        let mut text = CountingCanvas::new(&mut *layers.text);

        let title = self.frame_title(progress, t);
        let gate_frame = BackgroundFrame {
            title: title.as_deref(),
            beat,
            progress,
            now_ms: t * 1000.0,
        };
        let background_redrawn = self.background.poll(&gate_frame).is_some();
        let light = lighting_intensity(look.stage.as_ref(), beat);
        // The background layer keeps its pixels between redraws, so its light pass goes with the
        // redraw. The per-frame light pass is the one on the text layer below.
        if background_redrawn {
            draw_background(&mut background, look.background, &self.roles, beat, progress, t);
            draw_lighting(&mut background, look.light, &self.roles, light, beat, t);
        }

        particles.clear();
        let mut density = look.physics.particle_density;
        if self.interp.is_climax_moment(progress) {
            density *= self.interp.climax_particle_boost();
        }
        if let Some(stage) = &look.stage {
            density *= stage.particle_density;
        }
        if active.is_none() {
            density *= IDLE_PARTICLE_FACTOR;
        }
        let particle_total = draw_particles(
            &mut particles,
            &look.particles,
            particle_count(budget, density),
            t,
            beat,
        );

        text.clear();
        draw_lighting(&mut text, look.light, &self.roles, light, beat, t);
        let placed = match active {
            Some(i) => self.place_line(&mut text, i, t, progress, beat),
            None => {
                self.last_line = None;
                Vec::new()
            }
        };
        self.draw_words(&mut text, &placed, t, beat);
        if self.opts.show_hud {
            draw_hud(&mut text, progress, &self.roles);
        }

        let stats = DrawStats {
            draw_calls: background.draw_calls() + particles.draw_calls() + text.draw_calls(),
            background_redrawn,
            particles: particle_total,
            words: placed.len(),
            budget,
        };
        tracing::trace!(t, progress, beat, ?active, ?stats, "frame");
        stats
    }

    fn frame_title(&self, progress: f64, t: f64) -> Option<String> {
        if let Some(chapter) = self.interp.current_chapter(progress) {
            return Some(chapter.title.clone());
        }
        self.sections
            .iter()
            .find(|s| s.contains(t))
            .or_else(|| self.sections.last())
            .map(|s| format!("{:?} {}", s.role, s.index))
    }

    fn line_style(&self, line_index: usize, progress: f64) -> SystemStyle {
        if let Some(style) = &self.system {
            return style.clone();
        }
        let typo = self.interp.typography(Some(line_index), progress);
        SystemStyle {
            font: typo.font_family,
            weight: typo.font_weight,
            text_transform: typo.text_transform,
            letter_spacing: typo.letter_spacing * EM_PX,
            ..system_style(Some("pressure"))
        }
    }

    /// Lay out the active line and, when it just became active, record its words.
    fn place_line(
        &mut self,
        canvas: &mut dyn Canvas2d,
        line_index: usize,
        t: f64,
        progress: f64,
        beat: f64,
    ) -> Vec<PlacedWord> {
        let Some(line) = self.song.lines.get(line_index).cloned() else {
            return Vec::new();
        };
        let words: Vec<&str> = line.words().collect();
        if words.is_empty() || canvas.is_empty() {
            return Vec::new();
        }
        let style = self.line_style(line_index, progress);
        let (w, h) = (canvas.width(), canvas.height());
        let stacked = style.layout == LayoutMode::Stacked;

        let fs = *self.fitted.entry((line_index, style.font)).or_insert_with(|| {
            let fit_text = if stacked {
                words.iter().copied().max_by_key(|s| s.chars().count()).unwrap_or("")
            } else {
                line.text.as_str()
            };
            let rows = if stacked { words.len() as f64 } else { 1.0 };
            compute_fit_font_size(canvas, fit_text, w, &style)
                .min(h * MAX_LINE_HEIGHT_RATIO)
                .min(h * 0.8 / (rows * style.line_height))
        });

        canvas.save();
        canvas.set_font(FontSpec::new(style.font, fs).with_weight(style.weight));
        let displays: Vec<String> = words.iter().map(|s| style.text_transform.apply(s)).collect();
        let widths: Vec<f64> = displays
            .iter()
            .map(|d| canvas.measure_text(d) + d.chars().count() as f64 * style.letter_spacing)
            .collect();
        let gap = canvas.measure_text(" ").max(fs * 0.25);
        canvas.restore();

        let n = words.len();
        let total: f64 = widths.iter().sum::<f64>() + gap * (n - 1) as f64;
        let baseline = h / 2.0 + 0.35 * fs;
        let mut cursor = match style.layout {
            LayoutMode::Editorial => w * 0.1,
            _ => (w - total) / 2.0,
        };
        let mut centers = Vec::with_capacity(n);
        for (j, width) in widths.iter().enumerate() {
            let center = match style.layout {
                LayoutMode::Stacked => {
                    let row = j as f64 - (n - 1) as f64 / 2.0;
                    Point::new(w / 2.0, baseline + row * fs * style.line_height)
                }
                LayoutMode::Scattered => Point::new(
                    cursor + width / 2.0,
                    baseline + fs * 0.3 * (trig_noise(j as f64, 5.5) - 0.5),
                ),
                LayoutMode::Circular => Point::new(
                    cursor + width / 2.0,
                    baseline
                        - fs * 0.25 * (std::f64::consts::PI * (j as f64 + 0.5) / n as f64).sin(),
                ),
                LayoutMode::Centered | LayoutMode::Editorial => {
                    Point::new(cursor + width / 2.0, baseline)
                }
            };
            centers.push(center);
            cursor += width + gap;
        }

        if self.last_line != Some(line_index) {
            for (word, c) in words.iter().zip(&centers) {
                self.history.record(word, t, *c);
            }
            self.last_line = Some(line_index);
        }

        let local = t - line.start;
        let fade_in = (local / LINE_FADE_SEC).clamp(0.0, 1.0);
        let fade_out = ((line.end - t) / LINE_FADE_SEC).clamp(0.0, 1.0);
        let anim = LineAnim {
            progress: line_progress(&line, t),
            scale: 1.0,
            opacity: fade_in.min(fade_out),
            base_color: self.roles.text,
        };

        let mut placed = Vec::with_capacity(n);
        for (j, ((word, display), center)) in words.iter().zip(displays).zip(centers).enumerate() {
            let count = self.history.count(word);
            let props = word_visual_props(word, j, &anim, beat, count);
            let reveal = ((local - props.delay) / WORD_FADE_SEC).clamp(0.0, 1.0);
            if reveal <= 0.0 {
                continue;
            }
            let evolution = self.interp.apply_evolution_rule(word, self.history.get(word));
            let hero = self.interp.is_hero_word(line_index, word);
            let hero_scale = if hero { 1.15 } else { 1.0 };
            placed.push(PlacedWord {
                key: (*word).to_owned(),
                display,
                x: center.x + props.x_offset,
                y: center.y + props.y_offset + evolution.y_offset,
                size: fs * props.scale * evolution.scale_multiplier * hero_scale,
                font: style.font,
                weight: style.weight,
                color: evolution.color_override.unwrap_or(props.color),
                opacity: (props.opacity * evolution.opacity_multiplier * reveal).clamp(0.0, 1.0),
                glow: props.glow_radius + evolution.glow_radius,
                trail: props
                    .show_trail
                    .then_some((props.trail_count, props.x_offset, props.y_offset)),
                class: self.interp.elemental_class(word),
                hero,
                count,
                evolution,
            });
        }
        placed
    }

    /// Plain glyphs first, then elemental treatments and evolution rings on top.
    fn draw_words(&self, canvas: &mut dyn Canvas2d, placed: &[PlacedWord], t: f64, beat: f64) {
        for word in placed.iter().filter(|w| w.class == ElementalClass::None) {
            canvas.save();
            canvas.set_font(FontSpec::new(word.font, word.size).with_weight(word.weight));
            if word.glow > 0.0 {
                let center = Point::new(word.x, word.y - 0.35 * word.size);
                let radius = word.size * 0.6 + word.glow;
                canvas.set_global_alpha(word.opacity);
                canvas.set_fill(Paint::radial(
                    center,
                    radius,
                    &[(0.0, word.color.with_alpha(0.25)), (1.0, word.color.with_alpha(0.0))],
                ));
                canvas.fill_circle(center, radius);
            }
            if let Some((ghosts, dx, dy)) = word.trail {
                for k in 1..=ghosts {
                    let kf = f64::from(k);
                    canvas.set_global_alpha(word.opacity * 0.3 / kf);
                    canvas.set_fill(Paint::Solid(word.color));
                    canvas.fill_text(&word.display, word.x - dx * kf, word.y - dy * kf);
                }
            }
            canvas.set_global_alpha(word.opacity);
            canvas.set_fill(Paint::Solid(word.color));
            canvas.fill_text(&word.display, word.x, word.y);
            canvas.restore();
        }

        let size = CanvasSize::new(canvas.width() as u32, canvas.height() as u32);
        let mut opts = ElementalOptions {
            effect_quality: self.opts.effect_quality,
            bubble_positions: Vec::new(),
            cull_to: Some(size),
            font_family: None,
        };
        for word in placed {
            if word.class != ElementalClass::None {
                opts.font_family = Some(word.font.to_owned());
                canvas.save();
                canvas.set_global_alpha(word.opacity);
                canvas.set_font(FontSpec::new(word.font, word.size).with_weight(word.weight));
                let word_width = canvas.measure_text(&word.display);
                draw_elemental_word(
                    canvas,
                    &ElementalWord {
                        text: &word.display,
                        x: word.x,
                        y: word.y,
                        font_size: word.size,
                        word_width,
                        class: word.class,
                        time: t,
                        beat_intensity: beat,
                        appearance_count: word.count,
                        color_override: word.evolution.color_override,
                        is_hero: word.hero,
                    },
                    &opts,
                );
                canvas.restore();
            }
            draw_evolution_overlay(
                canvas,
                &word.evolution,
                word.x,
                word.y - 0.35 * word.size,
                word.size,
            );
            tracing::trace!(word = %word.key, class = ?word.class, "word drawn");
        }
    }
}

fn named_system(song: &SongInput, interp: &DirectionInterpreter) -> Option<SystemStyle> {
    song.system
        .as_deref()
        .or(interp.direction().system.as_deref())
        .map(|name| system_style(Some(name)))
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
