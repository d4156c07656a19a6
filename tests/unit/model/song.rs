use super::*;
use serde_json::json;

#[test]
fn parses_minimal_song_and_sorts_lines() {
    let v = json!({
        "durationSec": 30.0,
        "lines": [
            {"start": 10.0, "end": 12.0, "text": "b"},
            {"start": 1.0, "end": 2.0, "text": "a"}
        ]
    });
    let song = SongInput::from_reader(v.to_string().as_bytes()).unwrap();
    assert_eq!(song.lines[0].text, "a");
    assert!(song.beat_grid.is_empty());
    assert!(song.direction.is_empty());
}

#[test]
fn rejects_inverted_line() {
    let v = json!({
        "durationSec": 30.0,
        "lines": [{"start": 3.0, "end": 2.0, "text": "x"}]
    });
    let err = SongInput::from_reader(v.to_string().as_bytes()).unwrap_err();
    assert!(err.to_string().contains("ends before it starts"));
}
