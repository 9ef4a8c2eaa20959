use std::fmt;

use geoflux::Pass;
use geoflux::prelude::*;

// Simulate an external measurement type (like from a telemetry crate).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
struct LatencyMicros(u64);

// Implement FluxOrd for the external struct.
// This proves the trait is implementable by "outside crates".
impl FluxOrd for LatencyMicros {
    type Span = u64;

    fn span(&self, other: &Self) -> u64 {
        self.0.abs_diff(other.0)
    }

    fn tolerance(range: u64) -> Option<u64> {
        (range != 0).then(|| (range / 20).max(1))
    }
}

// Display is only needed for tracing, where values appear in statuses.
impl fmt::Display for LatencyMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

fn samples() -> Vec<LatencyMicros> {
    // Two latency bands with an outlier, the shape group migration targets.
    let mut values = Vec::new();
    for base in [250u64, 9_800, 255, 9_750, 248, 9_900, 252, 9_870] {
        for offset in 0..4 {
            values.push(LatencyMicros(base + offset));
        }
    }
    values.push(LatencyMicros(55));
    values
}

#[test]
fn test_external_struct_sorts_in_place() {
    let mut data = samples();
    let mut expected = data.clone();
    expected.sort_by_key(|v| v.0);

    geoflux_sort(&mut data).unwrap();
    assert_eq!(data, expected);
}

#[test]
fn test_external_struct_traces() {
    let data = samples();
    let events: Vec<_> = geoflux_trace(&data).collect::<Result<_, _>>().unwrap();

    let last = events.last().unwrap();
    assert_eq!(last.pass, Pass::Finished);

    let mut expected = data.clone();
    expected.sort_by_key(|v| v.0);
    assert_eq!(last.array, expected);

    // Statuses render through the type's own Display impl.
    assert!(events.iter().any(|e| e.status.contains("us")));
}
