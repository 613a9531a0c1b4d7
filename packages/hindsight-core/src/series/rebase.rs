//! Trajectory rebasing.

use crate::types::ValueTrajectory;
use crate::{Error, Result};

/// Value every rebased trajectory starts at.
pub const REBASE_REFERENCE: f64 = 100.0;

/// Rescale a trajectory so its first value equals `reference`.
///
/// Fails with [`Error::NoBaseline`] when the trajectory is empty or its first
/// value is not a positive number.
pub fn rebase(trajectory: &ValueTrajectory, reference: f64) -> Result<ValueTrajectory> {
    let base = match trajectory.first_value() {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => return Err(Error::NoBaseline),
    };

    let values = trajectory
        .values
        .iter()
        .map(|v| v / base * reference)
        .collect();

    ValueTrajectory::new(trajectory.dates.clone(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn trajectory(values: Vec<f64>) -> ValueTrajectory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..values.len() as u64)
            .map(|i| start + chrono::Days::new(i))
            .collect();
        ValueTrajectory::new(dates, values).unwrap()
    }

    #[test]
    fn test_rebase_starts_at_reference() {
        let rebased =
            rebase(&trajectory(vec![1_234_567.0, 1_300_000.0, 1_100_000.0]), 100.0).unwrap();

        assert_eq!(rebased.values[0], 100.0);
        assert_relative_eq!(rebased.values[1], 105.300_076_869, epsilon = 1e-6);
        assert_eq!(rebased.len(), 3);
    }

    #[test]
    fn test_rebase_custom_reference() {
        let rebased = rebase(&trajectory(vec![50.0, 75.0]), 1.0).unwrap();
        assert_eq!(rebased.values, vec![1.0, 1.5]);
    }

    #[test]
    fn test_rebase_no_baseline() {
        assert!(matches!(
            rebase(&trajectory(vec![]), REBASE_REFERENCE),
            Err(Error::NoBaseline)
        ));
        assert!(matches!(
            rebase(&trajectory(vec![0.0, 10.0]), REBASE_REFERENCE),
            Err(Error::NoBaseline)
        ));
    }
}
