use std::collections::HashMap;

use crate::direction::evolution::{EvolutionProps, EvolutionRule, resolve_evolution_for_count};
use crate::direction::palette::resolve_palette_ref;
use crate::direction::resolvers::{
    BackgroundSystem, MotionPhysics, TensionStage, TypographyProfile, WordDirectiveMap,
    build_word_directive_map, derive_climax_ratio, derive_tension_curve, enrich_sections,
    find_section_by_progress, find_section_index_by_progress, find_word_directive,
    get_tension_stage_for_progress, map_background_system, resolve_atmosphere_system,
    resolve_motion_physics, resolve_typography, section_bounds,
};
use crate::foundation::color::Color;
use crate::foundation::core::clamp_progress;
use crate::model::direction::{
    Chapter, CinematicDirection, DirectionSection, LineDirection, TensionStageDef, WordDirective,
};
use crate::render::elemental::{ElementalClass, elemental_for_word};
use crate::words::classify::{is_exact_hero_token_match, normalize_token};
use crate::words::history::WordHistory;

/// Half-width of the window around the authored climax.
const CLIMAX_WINDOW: f64 = 0.02;
const DEFAULT_PARTICLE_DIRECTIVE: &str = "ambient";
const DEFAULT_LIGHT_DIRECTIVE: &str = "steady";
const CANONICAL_STAGES: [&str; 4] = ["Setup", "Build", "Peak", "Release"];

/// Normalize an authored tension curve.
///
/// The result always carries the four canonical stages. Authored stages override the matching
/// canonical stage field by field; authored stages with other names are kept as well. With no
/// authored stages the curve comes from the emotional arc (slow-burn by default).
pub fn ensure_full_tension_curve(defs: &[TensionStageDef], arc: Option<&str>) -> Vec<TensionStage> {
    let base = derive_tension_curve(arc);
    if defs.is_empty() {
        return base;
    }

    let same_name = |d: &TensionStageDef, name: &str| {
        d.stage
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(name))
    };

    let mut out: Vec<TensionStage> = base
        .into_iter()
        .map(|stage| match defs.iter().find(|d| same_name(d, &stage.stage)) {
            Some(def) => merge_stage(stage, def),
            None => stage,
        })
        .collect();

    for def in defs {
        let canonical = CANONICAL_STAGES.iter().any(|n| same_name(def, n));
        if !canonical && let Some(name) = def.stage.as_deref() {
            let template = TensionStage {
                stage: name.trim().to_owned(),
                ..out[0].clone()
            };
            out.push(merge_stage(template, def));
        }
    }

    out.sort_by(|a, b| a.start_ratio.total_cmp(&b.start_ratio));
    out
}

fn merge_stage(mut stage: TensionStage, def: &TensionStageDef) -> TensionStage {
    let unit = |v: Option<f64>| v.filter(|x| x.is_finite()).map(|x| x.clamp(0.0, 1.0));
    let non_neg = |v: Option<f64>| v.filter(|x| x.is_finite()).map(|x| x.max(0.0));
    if let Some(v) = unit(def.start_ratio) {
        stage.start_ratio = v;
    }
    if let Some(v) = unit(def.end_ratio) {
        stage.end_ratio = v;
    }
    if stage.end_ratio < stage.start_ratio {
        std::mem::swap(&mut stage.start_ratio, &mut stage.end_ratio);
    }
    if let Some(v) = unit(def.motion_intensity) {
        stage.motion_intensity = v;
    }
    if let Some(v) = non_neg(def.particle_density) {
        stage.particle_density = v;
    }
    if let Some(v) = unit(def.light_brightness) {
        stage.light_brightness = v;
    }
    if let Some(v) = def.camera_movement.as_deref() {
        stage.camera_movement = v.to_owned();
    }
    if let Some(v) = unit(def.typography_aggression) {
        stage.typography_aggression = v;
    }
    stage
}

fn progress_boundaries(
    chapters: &[Chapter],
    sections: &[DirectionSection],
    tension: &[TensionStage],
) -> Vec<f64> {
    let mut edges: Vec<f64> = chapters
        .iter()
        .flat_map(|c| [c.start_ratio, c.end_ratio])
        .chain((0..sections.len()).flat_map(|i| {
            let (start, end) = section_bounds(sections, i);
            [start, end]
        }))
        .chain(tension.iter().flat_map(|s| [s.start_ratio, s.end_ratio]))
        .filter(|v| v.is_finite())
        .map(clamp_progress)
        .collect();
    edges.sort_by(f64::total_cmp);
    edges.dedup();
    edges
}

/// Read façade over a direction document plus the evolution memo.
///
/// Everything derivable from the document (sections, tension curve, word map, parsed evolution
/// rules, palette) is computed once at construction.
#[derive(Debug)]
pub struct DirectionInterpreter {
    direction: CinematicDirection,
    sections: Vec<DirectionSection>,
    tension: Vec<TensionStage>,
    words: WordDirectiveMap,
    rules: HashMap<String, EvolutionRule>,
    palette: Vec<Color>,
    evolution_cache: HashMap<(EvolutionRule, u32), EvolutionProps>,
    fingerprint: u64,
    boundaries: Vec<f64>,
}

impl DirectionInterpreter {
    /// Interpret a document with the built-in palette fallback.
    pub fn new(direction: CinematicDirection) -> Self {
        Self::with_palette(direction, &[])
    }

    /// Interpret a document; `fallback_palette` is used when the document names no palette.
    pub fn with_palette(direction: CinematicDirection, fallback_palette: &[Color]) -> Self {
        let sections = enrich_sections(&direction.sections);
        let tension = ensure_full_tension_curve(
            &direction.tension_curve,
            direction.emotional_arc.as_deref(),
        );
        let words = build_word_directive_map(&direction.word_directives);
        let rules = words
            .iter()
            .filter_map(|(key, d)| {
                let rule = EvolutionRule::parse(d.evolution_rule.as_deref()?);
                (rule != EvolutionRule::None).then(|| (key.clone(), rule))
            })
            .collect();
        let palette = resolve_palette_ref(direction.palette.as_ref(), fallback_palette);
        let fingerprint = direction.fingerprint();
        let boundaries = progress_boundaries(&direction.chapters, &sections, &tension);
        Self {
            direction,
            sections,
            tension,
            words,
            rules,
            palette,
            evolution_cache: HashMap::new(),
            fingerprint,
            boundaries,
        }
    }

    /// The interpreted document.
    pub fn direction(&self) -> &CinematicDirection {
        &self.direction
    }

    /// Document fingerprint (see [`CinematicDirection::fingerprint`]).
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Sections with ratios filled in.
    pub fn sections(&self) -> &[DirectionSection] {
        &self.sections
    }

    /// Normalized tension curve.
    pub fn tension_curve(&self) -> &[TensionStage] {
        &self.tension
    }

    /// Resolved palette.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Section at a song progress.
    pub fn section(&self, progress: f64) -> Option<&DirectionSection> {
        find_section_by_progress(&self.sections, progress)
    }

    /// Index of the section at a song progress.
    pub fn section_index(&self, progress: f64) -> Option<usize> {
        find_section_index_by_progress(&self.sections, progress)
    }

    /// Chapter containing `progress`, if the document has one.
    pub fn current_chapter(&self, progress: f64) -> Option<&Chapter> {
        let p = clamp_progress(progress);
        self.direction.chapters.iter().find(|c| c.contains(p))
    }

    /// Progress span around `progress` between two neighbouring chapter, section or tension
    /// stage edges.
    ///
    /// Every progress-keyed lookup of the interpreter answers the same anywhere inside the span.
    pub fn stable_span(&self, progress: f64) -> (f64, f64) {
        let p = clamp_progress(progress);
        let i = self.boundaries.partition_point(|b| *b <= p);
        let start = i.checked_sub(1).map_or(0.0, |j| self.boundaries[j]);
        let end = self.boundaries.get(i).copied().unwrap_or(1.0);
        (start, end.max(start))
    }

    /// Tension stage at a song progress.
    pub fn tension_stage(&self, progress: f64) -> Option<&TensionStage> {
        get_tension_stage_for_progress(&self.tension, progress)
    }

    /// Directive for a word (normalized exact match).
    pub fn word_directive(&self, word: &str) -> Option<&WordDirective> {
        find_word_directive(&self.words, word)
    }

    /// Storyboard entry for a line.
    ///
    /// Entries with an explicit `lineIndex` win; otherwise an un-indexed entry at that position
    /// is used.
    pub fn line_direction(&self, line_index: usize) -> Option<&LineDirection> {
        let storyboard = &self.direction.storyboard;
        storyboard
            .iter()
            .find(|d| d.line_index == Some(line_index))
            .or_else(|| {
                storyboard
                    .get(line_index)
                    .filter(|d| d.line_index.is_none())
            })
    }

    /// Whether `token` is the hero word of a line.
    pub fn is_hero_word(&self, line_index: usize, token: &str) -> bool {
        self.line_direction(line_index)
            .and_then(|d| d.hero_word.as_deref())
            .is_some_and(|hero| is_exact_hero_token_match(token, hero))
    }

    /// Climax progress: authored, else derived from a named emotional arc.
    pub fn climax_ratio(&self) -> Option<f64> {
        match (&self.direction.climax, &self.direction.emotional_arc) {
            (Some(c), _) if c.time_ratio.is_finite() => Some(c.time_ratio.clamp(0.0, 1.0)),
            (_, Some(arc)) => Some(derive_climax_ratio(Some(arc))),
            _ => None,
        }
    }

    /// True within ±2% of the climax.
    pub fn is_climax_moment(&self, progress: f64) -> bool {
        self.climax_ratio()
            .is_some_and(|r| (clamp_progress(progress) - r).abs() < CLIMAX_WINDOW)
    }

    /// Particle multiplier at the climax (authored, else 2).
    pub fn climax_particle_boost(&self) -> f64 {
        self.direction
            .climax
            .as_ref()
            .and_then(|c| c.max_particle_density)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(2.0)
    }

    /// Particle directive of the current chapter, `"ambient"` by default.
    pub fn particle_directive(&self, progress: f64) -> &str {
        self.current_chapter(progress)
            .and_then(|c| c.particle_directive.as_deref())
            .unwrap_or(DEFAULT_PARTICLE_DIRECTIVE)
    }

    /// Light directive of the current chapter, `"steady"` by default.
    pub fn light_directive(&self, progress: f64) -> &str {
        self.current_chapter(progress)
            .and_then(|c| c.light_directive.as_deref())
            .unwrap_or(DEFAULT_LIGHT_DIRECTIVE)
    }

    /// Typography for a line: storyboard, then chapter shift, then document default.
    pub fn typography(&self, line_index: Option<usize>, progress: f64) -> TypographyProfile {
        let line = line_index
            .and_then(|i| self.line_direction(i))
            .and_then(|d| d.typography.as_deref());
        let chapter = self
            .current_chapter(progress)
            .and_then(|c| c.typography_shift.as_deref());
        resolve_typography(line.or(chapter).or(self.direction.typography.as_deref()))
    }

    /// Motion physics for the song, or for the current section when it names a motion.
    pub fn motion_physics(&self, progress: f64) -> MotionPhysics {
        let section = self.section(progress).and_then(|s| s.motion.as_deref());
        resolve_motion_physics(section.or(self.direction.motion.as_deref()))
    }

    /// Background system at a song progress.
    ///
    /// Order: explicit document system, chapter background directive, section atmosphere,
    /// document atmosphere, scene description keywords.
    pub fn background_system(&self, progress: f64) -> BackgroundSystem {
        if let Some(s) = self
            .direction
            .background_system
            .as_deref()
            .and_then(BackgroundSystem::parse)
        {
            return s;
        }
        let chapter = self
            .current_chapter(progress)
            .and_then(|c| c.background_directive.as_deref())
            .map(map_background_system)
            .filter(|s| *s != BackgroundSystem::Default);
        let section = self
            .section(progress)
            .and_then(|s| s.atmosphere.as_deref())
            .map(|a| resolve_atmosphere_system(Some(a)))
            .filter(|s| *s != BackgroundSystem::Default);
        let document = Some(resolve_atmosphere_system(self.direction.atmosphere.as_deref()))
            .filter(|s| *s != BackgroundSystem::Default);
        let scene = self
            .direction
            .scene_description
            .as_deref()
            .map(map_background_system);
        chapter
            .or(section)
            .or(document)
            .or(scene)
            .unwrap_or_default()
    }

    /// Elemental class for a word: directive first, then the word's default association.
    pub fn elemental_class(&self, word: &str) -> ElementalClass {
        self.word_directive(word)
            .and_then(|d| d.elemental_class.as_deref())
            .map(ElementalClass::parse)
            .filter(|c| *c != ElementalClass::None)
            .unwrap_or_else(|| elemental_for_word(word))
    }

    /// Parsed evolution rule for a word.
    pub fn evolution_rule(&self, word: &str) -> &EvolutionRule {
        const NONE: &EvolutionRule = &EvolutionRule::None;
        self.rules.get(&normalize_token(word)).unwrap_or(NONE)
    }

    /// Evolution props for a word given its history, memoized by `(rule, count)`.
    pub fn apply_evolution_rule(
        &mut self,
        word: &str,
        history: Option<&WordHistory>,
    ) -> EvolutionProps {
        let rule = self.evolution_rule(word).clone();
        if rule == EvolutionRule::None {
            return EvolutionProps::default();
        }
        let count = history.map_or(0, |h| h.count);
        let palette = &self.palette;
        *self
            .evolution_cache
            .entry((rule, count))
            .or_insert_with_key(|(rule, count)| resolve_evolution_for_count(rule, *count, palette))
    }

    /// Number of memoized evolution results.
    pub fn evolution_cache_len(&self) -> usize {
        self.evolution_cache.len()
    }

    /// Drop memoized evolution results.
    pub fn invalidate_evolution_cache(&mut self) {
        self.evolution_cache.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/direction/interpreter.rs"]
mod tests;
