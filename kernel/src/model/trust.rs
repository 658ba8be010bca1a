use crate::model::user::ProfilePatch;

/// Trust level from which a user may book without a confirmation call.
pub const SKIP_CONFIRMATION_MIN_LEVEL: i32 = 2;

/// What a user's completed-booking history would entitle them to.
pub fn potential_level(completed_bookings: i64) -> i32 {
    match completed_bookings {
        n if n >= 10 => 3,
        n if n >= 5 => 2,
        n if n >= 2 => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustOutcome {
    /// The consecutive-cancellation counter is reset; the level stays put.
    PenaltyCleared,
    /// The trust level climbs one step towards its potential.
    LevelRaised(i32),
    /// Nothing to change this cycle.
    Unchanged,
}

impl TrustOutcome {
    /// The partial profile update to send upstream, if any.
    pub fn into_patch(self) -> Option<ProfilePatch> {
        match self {
            TrustOutcome::PenaltyCleared => Some(ProfilePatch {
                consecutive_cancellations: Some(0),
                ..Default::default()
            }),
            TrustOutcome::LevelRaised(level) => Some(ProfilePatch {
                trust_level: Some(level),
                ..Default::default()
            }),
            TrustOutcome::Unchanged => None,
        }
    }
}

/// Reputation adjustment applied when an owned booking completes.
///
/// Clearing a cancellation penalty and levelling up are mutually exclusive
/// within one completion, and the level only ever climbs one step at a
/// time, regardless of how far below its potential it sits.
pub fn evaluate(
    trust_level: i32,
    consecutive_cancellations: i32,
    completed_bookings: i64,
) -> TrustOutcome {
    if consecutive_cancellations > 0 {
        return TrustOutcome::PenaltyCleared;
    }
    if potential_level(completed_bookings) > trust_level {
        TrustOutcome::LevelRaised(trust_level + 1)
    } else {
        TrustOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn potential_ladder_boundaries() {
        assert_eq!(potential_level(0), 0);
        assert_eq!(potential_level(1), 0);
        assert_eq!(potential_level(2), 1);
        assert_eq!(potential_level(4), 1);
        assert_eq!(potential_level(5), 2);
        assert_eq!(potential_level(9), 2);
        assert_eq!(potential_level(10), 3);
        assert_eq!(potential_level(50), 3);
    }

    #[test]
    fn level_climbs_one_step_towards_potential() {
        // five completions entitle the user to level 2; from level 1 the
        // climb is a single step
        assert_eq!(evaluate(1, 0, 5), TrustOutcome::LevelRaised(2));
        // far below potential still only moves one step
        assert_eq!(evaluate(0, 0, 10), TrustOutcome::LevelRaised(1));
    }

    #[test]
    fn penalty_clear_takes_precedence_over_level_up() {
        assert_eq!(evaluate(1, 3, 10), TrustOutcome::PenaltyCleared);
        assert_eq!(
            evaluate(1, 3, 10).into_patch(),
            Some(ProfilePatch {
                consecutive_cancellations: Some(0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn at_potential_is_a_no_op() {
        assert_eq!(evaluate(2, 0, 5), TrustOutcome::Unchanged);
        assert_eq!(evaluate(3, 0, 25), TrustOutcome::Unchanged);
        assert!(evaluate(2, 0, 5).into_patch().is_none());
    }

    #[test]
    fn raised_level_patch_touches_only_trust_level() {
        let patch = evaluate(1, 0, 5).into_patch().unwrap();
        assert_eq!(patch.trust_level, Some(2));
        assert!(patch.consecutive_cancellations.is_none());
        assert!(patch.phone_number.is_none());
    }
}
