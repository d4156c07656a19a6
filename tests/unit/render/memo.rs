use super::*;

#[test]
fn same_bucket_hits() {
    let mut m = BucketMemo::new(0.05, 4);
    let mut calls = 0;
    let a = *m.get_or_insert_with(0.01, WHOLE_SONG, 1, 1, |p| {
        calls += 1;
        p
    });
    let b = *m.get_or_insert_with(0.03, WHOLE_SONG, 1, 1, |p| {
        calls += 1;
        p
    });
    assert_eq!(calls, 1);
    assert_eq!(a, b);
    assert!((a - 0.025).abs() < 1e-12);
    assert_eq!((m.hits(), m.misses()), (1, 1));
}

#[test]
fn value_depends_only_on_bucket() {
    let mut forward = BucketMemo::new(0.1, 4);
    let mut direct = BucketMemo::new(0.1, 4);
    for p in [0.0, 0.05, 0.1, 0.15, 0.21] {
        forward.get_or_insert_with(p, WHOLE_SONG, 0, 0, |q| q);
    }
    let f = *forward.get_or_insert_with(0.29, WHOLE_SONG, 0, 0, |q| q);
    let d = *direct.get_or_insert_with(0.29, WHOLE_SONG, 0, 0, |q| q);
    assert_eq!(f, d);
}

#[test]
fn seek_beyond_bucket_invalidates() {
    let mut m = BucketMemo::new(0.05, 8);
    m.get_or_insert_with(0.01, WHOLE_SONG, 0, 0, |p| p);
    m.get_or_insert_with(0.06, WHOLE_SONG, 0, 0, |p| p);
    assert_eq!(m.len(), 2);
    m.get_or_insert_with(0.5, WHOLE_SONG, 0, 0, |p| p);
    assert_eq!(m.len(), 1);
}

#[test]
fn direction_and_song_changes_invalidate() {
    let mut m = BucketMemo::new(0.05, 8);
    m.get_or_insert_with(0.01, WHOLE_SONG, 7, 1, |p| p);
    m.get_or_insert_with(0.02, WHOLE_SONG, 8, 1, |p| p);
    assert_eq!(m.misses(), 2);
    m.get_or_insert_with(0.02, WHOLE_SONG, 8, 2, |p| p);
    assert_eq!(m.misses(), 3);
    assert_eq!(m.len(), 1);
}

#[test]
fn capacity_evicts_oldest() {
    let mut m = BucketMemo::new(0.05, 2);
    m.get_or_insert_with(0.01, WHOLE_SONG, 0, 0, |p| p);
    m.get_or_insert_with(0.06, WHOLE_SONG, 0, 0, |p| p);
    m.get_or_insert_with(0.11, WHOLE_SONG, 0, 0, |p| p);
    assert_eq!(m.len(), 2);
    m.get_or_insert_with(0.07, WHOLE_SONG, 0, 0, |p| p);
    assert_eq!(m.misses(), 3);
}

#[test]
fn bucket_edges_and_bad_widths() {
    let m = BucketMemo::<()>::new(0.25, 1);
    assert_eq!(m.bucket_of(0.0), 0);
    assert_eq!(m.bucket_of(1.0), 3);
    assert_eq!(m.bucket_of(f64::NAN), 0);
    assert_eq!(BucketMemo::<()>::new(0.0, 1).bucket_width(), 0.05);
    assert_eq!(BucketMemo::<()>::new(f64::INFINITY, 1).bucket_width(), 0.05);
}

#[test]
fn manual_invalidate_clears() {
    let mut m = BucketMemo::new(0.05, 2);
    m.get_or_insert_with(0.5, WHOLE_SONG, 0, 0, |p| p);
    m.invalidate();
    assert!(m.is_empty());
}

#[test]
fn span_edge_splits_a_bucket() {
    let mut m = BucketMemo::new(0.05, 4);
    let before = *m.get_or_insert_with(0.31, (0.0, 0.33), 0, 0, |p| p);
    let after = *m.get_or_insert_with(0.34, (0.33, 1.0), 0, 0, |p| p);
    assert_eq!(m.misses(), 2);
    assert!((before - 0.315).abs() < 1e-12);
    assert!((after - 0.34).abs() < 1e-12);
    // Either side still hits its own entry.
    m.get_or_insert_with(0.302, (0.0, 0.33), 0, 0, |p| p);
    m.get_or_insert_with(0.349, (0.33, 1.0), 0, 0, |p| p);
    assert_eq!((m.hits(), m.misses()), (2, 2));
}
