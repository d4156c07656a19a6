use super::*;

fn ratios(s: &DirectionSection) -> (f64, f64) {
    (s.start_ratio.unwrap(), s.end_ratio.unwrap())
}

#[test]
fn typography_default_and_named_are_distinct_and_stable() {
    let d1 = resolve_typography(None);
    let d2 = resolve_typography(None);
    let b1 = resolve_typography(Some("bold-impact"));
    let b2 = resolve_typography(Some("Bold Impact"));
    assert_eq!(d1, d2);
    assert_eq!(b1, b2);
    assert_ne!(d1, b1);
    assert_eq!(d1.font_family, "Inter");
    assert_eq!(b1.text_transform, TextTransform::Uppercase);
    assert_eq!(resolve_typography(Some("wingdings")), d1);
}

#[test]
fn motion_physics_falls_back_to_fluid() {
    let fluid = resolve_motion_physics(Some("fluid"));
    assert_eq!(resolve_motion_physics(None), fluid);
    assert_eq!(resolve_motion_physics(Some("??")), fluid);
    assert!(resolve_motion_physics(Some("glitch")).chaos > fluid.chaos);
}

#[test]
fn atmosphere_table_and_default() {
    assert_eq!(resolve_atmosphere_system(Some("fiery")), BackgroundSystem::Fire);
    assert_eq!(resolve_atmosphere_system(Some("Neon")), BackgroundSystem::Urban);
    assert_eq!(resolve_atmosphere_system(Some("storm")), BackgroundSystem::Storm);
    assert_eq!(resolve_atmosphere_system(Some("unknown")), BackgroundSystem::Default);
    assert_eq!(resolve_atmosphere_system(None).name(), "default");
}

#[test]
fn background_keywords_follow_priority() {
    assert_eq!(map_background_system("a burning city"), BackgroundSystem::Fire);
    assert_eq!(map_background_system("Waves under lightning"), BackgroundSystem::Ocean);
    assert_eq!(map_background_system("neon street at night"), BackgroundSystem::Urban);
    assert_eq!(map_background_system("an empty room"), BackgroundSystem::Void);
    assert_eq!(map_background_system("meadow"), BackgroundSystem::Default);
}

#[test]
fn enrich_empty_gives_three_thirds() {
    let s = enrich_sections(&[]);
    assert_eq!(s.len(), 3);
    assert_eq!(ratios(&s[0]).0, 0.0);
    assert_eq!(ratios(&s[2]).1, 1.0);
    for w in s.windows(2) {
        assert_eq!(ratios(&w[0]).1, ratios(&w[1]).0);
    }
    assert_eq!(s[2].description.as_deref(), Some("Climax"));
}

#[test]
fn enrich_fills_missing_and_inverted_ratios() {
    let input = vec![
        DirectionSection::default(),
        DirectionSection {
            start_ratio: Some(0.9),
            end_ratio: Some(0.2),
            ..Default::default()
        },
        DirectionSection {
            start_ratio: Some(0.5),
            ..Default::default()
        },
        DirectionSection::default(),
    ];
    let s = enrich_sections(&input);
    assert_eq!(ratios(&s[0]), (0.0, 0.25));
    assert_eq!(ratios(&s[1]), (0.25, 0.5));
    assert_eq!(ratios(&s[2]), (0.5, 0.75));
    assert_eq!(ratios(&s[3]), (0.75, 1.0));
}

#[test]
fn section_lookup_is_valid_for_all_progress() {
    let sections = enrich_sections(&[]);
    for i in 0..=100 {
        let p = i as f64 / 100.0;
        let idx = find_section_index_by_progress(&sections, p).unwrap();
        assert!(idx < sections.len());
        let (start, end) = ratios(&sections[idx]);
        if p < 1.0 {
            assert!(start <= p && p < end, "p={p} idx={idx}");
        } else {
            assert_eq!(idx, sections.len() - 1);
        }
    }
    assert_eq!(find_section_index_by_progress(&sections, -3.0), Some(0));
    assert_eq!(find_section_index_by_progress(&sections, f64::NAN), Some(0));
    assert!(find_section_by_progress(&[], 0.5).is_none());
}

#[test]
fn word_directive_lookup_is_exact() {
    let directives = vec![WordDirective {
        word: "Fire!".into(),
        emphasis_level: Some(0.9),
        ..Default::default()
    }];
    let map = build_word_directive_map(&directives);
    assert!(find_word_directive(&map, "FIRE").is_some());
    assert!(find_word_directive(&map, "fire,").is_some());
    assert!(find_word_directive(&map, "firelight").is_none());
    assert!(find_word_directive(&map, "!!").is_none());
}

#[test]
fn tension_curves_are_contiguous_over_unit_interval() {
    for arc in ["slow-burn", "surge", "collapse", "dawn", "flatline", "eruption", "??"] {
        let curve = derive_tension_curve(Some(arc));
        assert_eq!(curve.len(), 4, "{arc}");
        assert_eq!(curve[0].start_ratio, 0.0);
        assert_eq!(curve[3].end_ratio, 1.0);
        for w in curve.windows(2) {
            assert_eq!(w[0].end_ratio, w[1].start_ratio, "{arc}");
        }
    }
    assert_eq!(derive_tension_curve(Some("nope")), derive_tension_curve(None));
}

#[test]
fn tension_stage_lookup_and_climax_ratio() {
    let curve = derive_tension_curve(Some("slow-burn"));
    assert_eq!(get_tension_stage_for_progress(&curve, 0.7).unwrap().stage, "Peak");
    assert_eq!(get_tension_stage_for_progress(&curve, 1.0).unwrap().stage, "Release");
    assert!(get_tension_stage_for_progress(&[], 0.5).is_none());

    assert_eq!(derive_climax_ratio(Some("eruption")), 0.6);
    assert_eq!(derive_climax_ratio(Some("collapse")), 0.15);
    assert_eq!(derive_climax_ratio(Some("dawn")), 0.85);
    assert_eq!(derive_climax_ratio(None), 0.65);
}

#[test]
fn text_transform_applies() {
    assert_eq!(TextTransform::Uppercase.apply("Rise"), "RISE");
    assert_eq!(TextTransform::Lowercase.apply("Rise"), "rise");
    assert_eq!(TextTransform::None.apply("Rise"), "Rise");
}
