#![cfg(feature = "serde")]

use geoflux::{HighlightTag, Pass, TraceEvent, geoflux_trace};

#[test]
fn test_events_round_trip_through_json() {
    let data: Vec<i32> = (1..=30).rev().collect();
    let events: Vec<TraceEvent<i32>> = geoflux_trace(&data).collect::<Result<_, _>>().unwrap();

    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<TraceEvent<i32>> = serde_json::from_str(&json).unwrap();
    assert_eq!(events, back);
}

#[test]
fn test_event_schema_is_renderer_friendly() {
    let data = vec![3, 1, 2];
    let events: Vec<TraceEvent<i32>> = geoflux_trace(&data).collect::<Result<_, _>>().unwrap();
    let value = serde_json::to_value(&events[0]).unwrap();

    // Renderers read these four fields by name.
    assert!(value.get("array").is_some());
    assert!(value.get("pass").is_some());
    assert!(value.get("status").is_some());
    assert!(value.get("highlights").is_some());
}

#[test]
fn test_tags_serialize_as_variant_names() {
    assert_eq!(
        serde_json::to_string(&Pass::Finished).unwrap(),
        "\"Finished\""
    );
    assert_eq!(
        serde_json::to_string(&HighlightTag::MovedGroup).unwrap(),
        "\"MovedGroup\""
    );
}
