//! Goal bookkeeping

use crate::{MonitorError, MonitorResult};

/// Goal used when nothing valid is persisted
pub const DEFAULT_GOAL_MINUTES: u32 = 120;

/// Upper bound accepted by [`validate_goal`]
pub const MAX_GOAL_MINUTES: u32 = 480;

/// Accept `0 < minutes <= 480`
pub fn validate_goal(minutes: i64) -> MonitorResult<u32> {
    if minutes > 0 && minutes <= i64::from(MAX_GOAL_MINUTES) {
        Ok(minutes as u32)
    } else {
        Err(MonitorError::Validation { minutes })
    }
}

/// Percentage of the goal reached, clamped to `[0, 100]`.
///
/// Always derived from the latest study time and goal, never accumulated.
pub fn goal_progress(study_time: f64, goal_minutes: u32) -> f64 {
    if goal_minutes == 0 || !study_time.is_finite() {
        return 0.0;
    }
    (100.0 * study_time / f64::from(goal_minutes)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_bounds() {
        assert!(validate_goal(0).is_err());
        assert!(validate_goal(-30).is_err());
        assert!(validate_goal(481).is_err());
        assert_eq!(validate_goal(1).unwrap(), 1);
        assert_eq!(validate_goal(30).unwrap(), 30);
        assert_eq!(validate_goal(480).unwrap(), 480);
    }

    #[test]
    fn test_progress_is_proportional() {
        assert_eq!(goal_progress(60.0, 120), 50.0);
        assert_eq!(goal_progress(30.0, 120), 25.0);
        assert_eq!(goal_progress(0.0, 120), 0.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(goal_progress(150.0, 120), 100.0);
        assert_eq!(goal_progress(-5.0, 120), 0.0);
        assert_eq!(goal_progress(f64::NAN, 120), 0.0);
    }

    #[test]
    fn test_progress_follows_goal_changes() {
        let study_time = 90.0;
        assert_eq!(goal_progress(study_time, 120), 75.0);
        assert_eq!(goal_progress(study_time, 180), 50.0);
    }
}
