//! Day-over-day movement: up/down/flat classification plus a signed
//! percentage label, computed between two optional observations.

/// Percent-change magnitude below which a movement is reported as flat.
/// Tunable; day-to-day scrape noise sits well inside this band.
pub const FLAT_THRESHOLD_PCT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Flat => "→",
        }
    }

    /// CSS class used by the HTML report's trend pills.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub direction: Direction,
    /// One-decimal percentage with an explicit `+` for zero and positive
    /// deltas, e.g. `+3.2%`, `-0.8%`, `+0.0%`.
    pub pct: String,
}

/// Classifies the change from `previous` to `current`. Either side absent,
/// or a zero baseline, yields no movement at all.
pub fn movement(previous: Option<f64>, current: Option<f64>) -> Option<Movement> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }

    let delta = (current - previous) / previous * 100.0;
    // Magnitudes under half the label precision would print as "-0.0%".
    let printable = if delta.abs() < 0.05 { 0.0 } else { delta };
    let direction = if delta.abs() < FLAT_THRESHOLD_PCT {
        Direction::Flat
    } else if delta > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    Some(Movement {
        direction,
        pct: format!("{printable:+.1}%"),
    })
}

/// Most recent observation of a metric strictly before the last record.
/// Gap days (records where the metric is absent) are skipped so a single
/// failed scrape does not silently kill the trend.
pub fn previous_observation<T, F>(records: &[T], value: F) -> Option<f64>
where
    F: Fn(&T) -> Option<f64>,
{
    let (_, earlier) = records.split_last()?;
    earlier.iter().rev().find_map(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_are_flat_with_positive_zero() {
        let m = movement(Some(100.0), Some(100.0)).unwrap();
        assert_eq!(m.direction, Direction::Flat);
        assert_eq!(m.pct, "+0.0%");
    }

    #[test]
    fn increase_is_up_with_plus_sign() {
        let m = movement(Some(100.0), Some(150.0)).unwrap();
        assert_eq!(m.direction, Direction::Up);
        assert_eq!(m.pct, "+50.0%");
    }

    #[test]
    fn decrease_is_down_with_minus_sign() {
        let m = movement(Some(100.0), Some(50.0)).unwrap();
        assert_eq!(m.direction, Direction::Down);
        assert_eq!(m.pct, "-50.0%");
    }

    #[test]
    fn zero_baseline_suppresses_movement() {
        assert_eq!(movement(Some(0.0), Some(50.0)), None);
        assert_eq!(movement(Some(0.0), Some(0.0)), None);
    }

    #[test]
    fn absent_side_suppresses_movement() {
        assert_eq!(movement(None, Some(50.0)), None);
        assert_eq!(movement(Some(50.0), None), None);
        assert_eq!(movement(None, None), None);
    }

    #[test]
    fn flat_band_is_half_a_percent() {
        let m = movement(Some(1000.0), Some(1004.0)).unwrap();
        assert_eq!(m.direction, Direction::Flat);
        assert_eq!(m.pct, "+0.4%");

        let m = movement(Some(1000.0), Some(1005.0)).unwrap();
        assert_eq!(m.direction, Direction::Up);
        assert_eq!(m.pct, "+0.5%");

        let m = movement(Some(1000.0), Some(996.0)).unwrap();
        assert_eq!(m.direction, Direction::Flat);
        assert_eq!(m.pct, "-0.4%");
    }

    #[test]
    fn tiny_negative_delta_never_prints_minus_zero() {
        let m = movement(Some(100_000.0), Some(99_999.0)).unwrap();
        assert_eq!(m.direction, Direction::Flat);
        assert_eq!(m.pct, "+0.0%");
    }

    #[test]
    fn previous_observation_skips_gap_days() {
        let days = [Some(100.0), None, Some(120.0)];
        assert_eq!(previous_observation(&days, |d| *d), Some(100.0));
    }

    #[test]
    fn previous_observation_needs_an_earlier_record() {
        let days = [Some(120.0)];
        assert_eq!(previous_observation(&days, |d| *d), None);
        let days: [Option<f64>; 0] = [];
        assert_eq!(previous_observation(&days, |d| *d), None);
    }
}
