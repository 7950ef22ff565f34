use serde::{Deserialize, Serialize};

/// Deltas smaller than this are rounding noise, not movement.
const DELTA_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
    /// One side of the pair had no data. Never guessed.
    Unknown,
}

/// One month's coverage value, or an explicit absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: Option<f64>,
}

impl TrendPoint {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Movement between two consecutive months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStep {
    pub from_label: String,
    pub to_label: String,
    pub delta: Option<f64>,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResult {
    /// Chronological order, oldest first. Consumers must not reorder.
    pub points: Vec<TrendPoint>,
    pub steps: Vec<TrendStep>,
}

/// Pairwise deltas and directions over an ordered sequence of points.
pub fn analyze(points: &[TrendPoint]) -> TrendResult {
    let steps = points
        .windows(2)
        .map(|pair| {
            let (older, newer) = (&pair[0], &pair[1]);
            let delta = match (older.value, newer.value) {
                (Some(old), Some(new)) => Some(new - old),
                _ => None,
            };
            let direction = match delta {
                Some(d) if d > DELTA_EPSILON => TrendDirection::Up,
                Some(d) if d < -DELTA_EPSILON => TrendDirection::Down,
                Some(_) => TrendDirection::Flat,
                None => TrendDirection::Unknown,
            };
            TrendStep {
                from_label: older.label.clone(),
                to_label: newer.label.clone(),
                delta,
                direction,
            }
        })
        .collect();

    TrendResult {
        points: points.to_vec(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: [Option<f64>; 3]) -> Vec<TrendPoint> {
        vec![
            TrendPoint::new("Nov 2025", values[0]),
            TrendPoint::new("Dec 2025", values[1]),
            TrendPoint::new("Jan 2026", values[2]),
        ]
    }

    #[test]
    fn up_then_down() {
        let result = analyze(&points([Some(40.0), Some(42.5), Some(39.0)]));
        assert_eq!(result.steps.len(), 2);

        assert_eq!(result.steps[0].direction, TrendDirection::Up);
        assert!((result.steps[0].delta.unwrap() - 2.5).abs() < 1e-10);

        assert_eq!(result.steps[1].direction, TrendDirection::Down);
        assert!((result.steps[1].delta.unwrap() + 3.5).abs() < 1e-10);
    }

    #[test]
    fn small_delta_is_flat() {
        let result = analyze(&points([Some(40.0), Some(40.05), Some(39.95)]));
        assert_eq!(result.steps[0].direction, TrendDirection::Flat);
        assert_eq!(result.steps[1].direction, TrendDirection::Flat);
    }

    #[test]
    fn delta_at_epsilon_is_flat() {
        let result = analyze(&points([Some(40.0), Some(40.1), Some(40.0)]));
        assert_eq!(result.steps[0].direction, TrendDirection::Flat);
        assert_eq!(result.steps[1].direction, TrendDirection::Flat);
    }

    #[test]
    fn absent_middle_makes_both_pairs_unknown() {
        let result = analyze(&points([Some(40.0), None, Some(39.0)]));
        assert_eq!(result.steps[0].direction, TrendDirection::Unknown);
        assert!(result.steps[0].delta.is_none());
        assert_eq!(result.steps[1].direction, TrendDirection::Unknown);
        assert!(result.steps[1].delta.is_none());
    }

    #[test]
    fn all_absent_does_not_panic() {
        let result = analyze(&points([None, None, None]));
        assert!(result.steps.iter().all(|s| s.direction == TrendDirection::Unknown));
    }

    #[test]
    fn order_is_preserved() {
        let result = analyze(&points([Some(1.0), Some(2.0), Some(3.0)]));
        assert_eq!(result.points[0].label, "Nov 2025");
        assert_eq!(result.points[2].label, "Jan 2026");
        assert_eq!(result.steps[0].from_label, "Nov 2025");
        assert_eq!(result.steps[1].to_label, "Jan 2026");
    }

    #[test]
    fn fewer_than_two_points_yields_no_steps() {
        let result = analyze(&[TrendPoint::new("Jan 2026", Some(50.0))]);
        assert!(result.steps.is_empty());
    }
}
