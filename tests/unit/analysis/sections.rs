use super::*;

fn assert_partition(sections: &[AudioSection], duration: f64) {
    assert!(!sections.is_empty());
    assert!(sections.len() <= MAX_SECTIONS);
    assert_eq!(sections[0].start_sec, 0.0);
    assert_eq!(sections[sections.len() - 1].end_sec, duration);
    for (i, s) in sections.iter().enumerate() {
        assert_eq!(s.index, i);
        assert!(s.end_sec > s.start_sec);
        if i + 1 < sections.len() {
            assert_eq!(s.end_sec, sections[i + 1].start_sec);
            assert!(s.duration_sec >= MIN_SECTION_SEC);
        }
    }
}

/// Loud/quiet alternation every 10 s gives many energy boundaries.
fn alternating_signature(duration: f64) -> SongSignature {
    let n = (duration / ENERGY_WINDOW_SEC) as usize;
    let curve = (0..n)
        .map(|i| {
            let t = i as f64 * ENERGY_WINDOW_SEC;
            if ((t / 10.0) as usize) % 2 == 0 { 0.3 } else { 0.9 }
        })
        .collect();
    SongSignature::new(curve, 2400.0)
}

#[test]
fn zero_duration_yields_nothing() {
    let sig = SongSignature::default();
    assert!(detect_sections(&sig, &BeatGrid::default(), &[], 0.0).is_empty());
    assert!(detect_sections(&sig, &BeatGrid::default(), &[], f64::NAN).is_empty());
}

#[test]
fn minimal_song_still_has_one_full_section() {
    let grid = BeatGrid::regular(120.0, 180.0);
    let lines = vec![LyricLine::new(10.0, 12.0, "we rise up")];
    let sections = detect_sections(&SongSignature::default(), &grid, &lines, 180.0);
    assert_partition(&sections, 180.0);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].lyrics.len(), 1);
}

#[test]
fn many_energy_changes_merge_down_to_cap() {
    let duration = 200.0;
    let sig = alternating_signature(duration);
    let grid = BeatGrid::regular(100.0, duration);
    let sections = detect_sections(&sig, &grid, &[], duration);
    assert_partition(&sections, duration);
    assert_eq!(sections.len(), MAX_SECTIONS);
}

#[test]
fn detection_is_idempotent() {
    let duration = 120.0;
    let sig = alternating_signature(duration);
    let grid = BeatGrid::regular(128.0, duration);
    let lines = vec![
        LyricLine::new(12.0, 15.0, "hold on"),
        LyricLine::new(40.0, 43.0, "hold on"),
        LyricLine::new(80.0, 84.0, "let it burn"),
    ];
    let a = detect_sections(&sig, &grid, &lines, duration);
    let b = detect_sections(&sig, &grid, &lines, duration);
    assert_eq!(a, b);
    assert_partition(&a, duration);
}

#[test]
fn lyric_gaps_create_boundaries_without_audio() {
    let lines = vec![
        LyricLine::new(1.0, 5.0, "first"),
        LyricLine::new(20.0, 25.0, "second"),
    ];
    let sections = detect_sections(&SongSignature::default(), &BeatGrid::default(), &lines, 40.0);
    assert_partition(&sections, 40.0);
    assert!(sections.iter().any(|s| (s.start_sec - 12.5).abs() < 1e-9));
}

#[test]
fn snapping_collapses_near_duplicates() {
    let b = snap_boundaries(vec![10.0, 11.0, 11.5, 30.0, 0.5, 59.0], 60.0);
    assert_eq!(b, vec![0.0, 10.75, 30.0, 60.0]);
}

#[test]
fn short_segments_are_dropped_except_last() {
    let b = drop_short_segments(&[0.0, 2.0, 10.0, 11.0, 20.0, 21.0]);
    assert_eq!(b, vec![0.0, 10.0, 20.0, 21.0]);
}

#[test]
fn loud_dense_repeated_section_is_chorus() {
    let duration = 60.0;
    let mut curve = vec![0.3; 40];
    curve.extend(vec![0.95; 40]);
    curve.extend(vec![0.3; 40]);
    let sig = SongSignature::new(curve, 2400.0);
    let grid = BeatGrid::regular(150.0, duration);
    let lines = vec![
        LyricLine::new(2.0, 4.0, "intro words"),
        LyricLine::new(8.0, 10.0, "verse one"),
        LyricLine::new(12.0, 14.0, "verse two"),
        LyricLine::new(22.0, 24.0, "we are the fire"),
        LyricLine::new(26.0, 28.0, "we are the fire"),
        LyricLine::new(44.0, 46.0, "fading"),
    ];
    let sections = detect_sections(&sig, &grid, &lines, duration);
    assert_partition(&sections, duration);
    let loud = sections
        .iter()
        .find(|s| s.contains(25.0))
        .expect("section at 25s");
    assert_eq!(loud.role, SectionRole::Chorus);
    assert!(loud.has_lyric_repetition);
}

#[test]
fn spectral_character_thresholds() {
    let inputs_for = |centroid: f64, energy: f64| {
        let sig = SongSignature::new(vec![energy; 20], centroid);
        let grid = BeatGrid::default();
        let sections = detect_sections(&sig, &grid, &[], 10.0);
        sections[0].spectral_character
    };
    assert_eq!(inputs_for(1000.0, 0.5), SpectralCharacter::Warm);
    assert_eq!(inputs_for(4000.0, 0.5), SpectralCharacter::Bright);
    assert_eq!(inputs_for(2500.0, 0.5), SpectralCharacter::Full);
    assert_eq!(inputs_for(2500.0, 0.01), SpectralCharacter::Thin);
}

fn section(start: f64, end: f64, avg_energy: f64, lyric_line_count: usize) -> AudioSection {
    AudioSection {
        index: 0,
        start_sec: start,
        end_sec: end,
        duration_sec: end - start,
        avg_energy,
        peak_energy: avg_energy,
        energy_delta: 0.0,
        spectral_character: SpectralCharacter::Full,
        beat_density: 2.0,
        role: SectionRole::Verse,
        lyrics: Vec::new(),
        lyric_line_count,
        has_lyric_repetition: false,
    }
}

fn roles_of(mut sections: Vec<AudioSection>, duration: f64) -> Vec<SectionRole> {
    for i in 0..sections.len() {
        sections[i].index = i;
        if i > 0 {
            sections[i].energy_delta = sections[i].avg_energy - sections[i - 1].avg_energy;
        }
    }
    classify_roles(&mut sections, duration);
    sections.iter().map(|s| s.role).collect()
}

#[test]
fn quiet_opening_without_lyrics_is_intro() {
    let roles = roles_of(
        vec![
            section(0.0, 10.0, 0.3, 0),
            section(10.0, 50.0, 0.3, 3),
            section(50.0, 100.0, 0.3, 3),
        ],
        100.0,
    );
    assert_eq!(roles[0], SectionRole::Intro);
    assert_eq!(roles[1], SectionRole::Verse);
}

#[test]
fn falling_last_section_is_outro() {
    let roles = roles_of(
        vec![
            section(0.0, 20.0, 0.5, 2),
            section(20.0, 60.0, 0.5, 2),
            section(60.0, 100.0, 0.3, 2),
        ],
        100.0,
    );
    assert_eq!(roles[2], SectionRole::Outro);

    let rising = roles_of(
        vec![section(0.0, 60.0, 0.3, 2), section(60.0, 100.0, 0.5, 2)],
        100.0,
    );
    assert_ne!(rising[1], SectionRole::Outro);
}

#[test]
fn loud_dense_instrumental_is_drop() {
    let mut drop = section(20.0, 50.0, 0.9, 0);
    drop.beat_density = 2.5;
    let roles = roles_of(
        vec![
            section(0.0, 20.0, 0.4, 2),
            drop,
            section(50.0, 100.0, 0.4, 2),
        ],
        100.0,
    );
    assert_eq!(roles[0], SectionRole::Verse);
    assert_eq!(roles[1], SectionRole::Drop);
}

#[test]
fn rise_into_a_loud_section_is_prechorus() {
    let mut chorus = section(40.0, 70.0, 0.9, 2);
    chorus.beat_density = 2.5;
    chorus.has_lyric_repetition = true;
    let roles = roles_of(
        vec![
            section(0.0, 20.0, 0.3, 2),
            section(20.0, 40.0, 0.5, 2),
            chorus,
            section(70.0, 100.0, 0.5, 2),
        ],
        100.0,
    );
    assert_eq!(
        roles,
        vec![
            SectionRole::Verse,
            SectionRole::Prechorus,
            SectionRole::Chorus,
            SectionRole::Outro,
        ]
    );
}

#[test]
fn sparse_quiet_middle_is_breakdown() {
    let roles = roles_of(
        vec![
            section(0.0, 20.0, 0.6, 2),
            section(20.0, 40.0, 0.6, 2),
            section(40.0, 60.0, 0.2, 1),
            section(60.0, 100.0, 0.6, 2),
        ],
        100.0,
    );
    assert_eq!(roles[2], SectionRole::Breakdown);
    assert_eq!(roles[3], SectionRole::Verse);

    // Too early in the song.
    let early = roles_of(
        vec![
            section(0.0, 5.0, 0.6, 2),
            section(5.0, 15.0, 0.2, 1),
            section(15.0, 100.0, 0.6, 2),
        ],
        100.0,
    );
    assert_ne!(early[1], SectionRole::Breakdown);
}

#[test]
fn timbre_change_between_matching_neighbours_is_bridge() {
    let mut warm = section(45.0, 70.0, 0.5, 2);
    warm.spectral_character = SpectralCharacter::Warm;
    let fixture = vec![
        section(0.0, 20.0, 0.5, 2),
        section(20.0, 45.0, 0.5, 2),
        warm,
        section(70.0, 100.0, 0.5, 2),
    ];
    assert_eq!(roles_of(fixture.clone(), 100.0)[2], SectionRole::Bridge);

    let mut same_after = fixture;
    same_after[3].spectral_character = SpectralCharacter::Warm;
    assert_eq!(roles_of(same_after, 100.0)[2], SectionRole::Verse);
}

#[test]
fn per_window_centroid_marks_a_bridge() {
    let duration = 60.0;
    let curve: Vec<f64> = (0..120)
        .map(|i| if (49..77).contains(&i) { 1200.0 } else { 2400.0 })
        .collect();
    let sig = SongSignature::new(vec![0.5; 120], 2400.0).with_centroid_curve(curve);
    let lines = vec![
        LyricLine::new(1.0, 8.0, "headlights on the wire"),
        LyricLine::new(13.0, 22.0, "counting every mile"),
        LyricLine::new(27.0, 36.0, "the engine hums low"),
        LyricLine::new(41.0, 50.0, "back into the light"),
        LyricLine::new(55.0, 59.0, "gone"),
    ];
    let sections = detect_sections(&sig, &BeatGrid::default(), &lines, duration);
    assert_partition(&sections, duration);
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[2].start_sec, 24.5);
    assert_eq!(sections[2].spectral_character, SpectralCharacter::Warm);
    assert_eq!(sections[3].spectral_character, SpectralCharacter::Full);
    assert_eq!(sections[2].role, SectionRole::Bridge);

    let flat = SongSignature::new(vec![0.5; 120], 2400.0);
    let sections = detect_sections(&flat, &BeatGrid::default(), &lines, duration);
    assert_eq!(sections[2].role, SectionRole::Verse);
}

#[test]
fn roles_are_recomputed_after_cap_merges() {
    let duration = 200.0;
    let sig = alternating_signature(duration);
    let grid = BeatGrid::regular(140.0, duration);
    let lines = vec![
        LyricLine::new(3.0, 6.0, "hold on"),
        LyricLine::new(45.0, 48.0, "hold on"),
        LyricLine::new(110.0, 114.0, "let it burn"),
        LyricLine::new(150.0, 153.0, "hold on"),
    ];
    let sections = detect_sections(&sig, &grid, &lines, duration);
    assert_partition(&sections, duration);
    assert_eq!(sections.len(), MAX_SECTIONS);

    // Rebuilding from the surviving bounds must give identical stats, deltas and roles.
    let mut bounds: Vec<f64> = sections.iter().map(|s| s.start_sec).collect();
    bounds.push(duration);
    let inputs = Inputs {
        signature: &sig,
        beat_grid: &grid,
        lines: &lines,
        duration_sec: duration,
    };
    assert_eq!(build_sections(&inputs, &bounds), sections);

    let mut reclassified = sections.clone();
    classify_roles(&mut reclassified, duration);
    assert_eq!(reclassified, sections);
    for pair in sections.windows(2) {
        let delta = pair[1].avg_energy - pair[0].avg_energy;
        assert!((pair[1].energy_delta - delta).abs() < 1e-12);
    }
}
