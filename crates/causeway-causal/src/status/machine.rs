use causeway_core::config::ThresholdConfig;
use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::ComponentStatus;

/// Outcome of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to write.
    NoOp,
    /// Persist the new counter, status unchanged.
    Progress { counter: u32 },
    /// Commit `to` and reset the counter.
    Commit { to: ComponentStatus },
}

/// Decide what an observation does to a component in `(current, counter)`.
///
/// `INITIALIZING` components graduate to `NORMAL` after
/// `thresholds.initializing` observations of either kind. Otherwise a run of
/// observations in the other category commits once it reaches the
/// `confirmed` (normal → abnormal) or `normal` (abnormal → normal)
/// threshold; one observation in the current category aborts the run.
pub fn decide(
    current: ComponentStatus,
    counter: u32,
    observed: ComponentStatus,
    thresholds: &ThresholdConfig,
) -> CausewayResult<Decision> {
    if observed == ComponentStatus::Initializing {
        return Err(CausewayError::InvalidStatus {
            status: observed.to_string(),
        });
    }

    if current == ComponentStatus::Initializing {
        let threshold = thresholds.initializing.max(1);
        return Ok(if counter < threshold - 1 {
            Decision::Progress {
                counter: counter + 1,
            }
        } else {
            Decision::Commit {
                to: ComponentStatus::Normal,
            }
        });
    }

    if !current.changes_category(observed) {
        return Ok(if counter != 0 {
            Decision::Progress { counter: 0 }
        } else {
            Decision::NoOp
        });
    }

    let threshold = if current.is_normal() {
        thresholds.confirmed
    } else {
        thresholds.normal
    }
    .max(1);
    let next = counter.saturating_add(1);
    Ok(if next >= threshold {
        Decision::Commit { to: observed }
    } else {
        Decision::Progress { counter: next }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ComponentStatus::*;

    fn thresholds(initializing: u32, confirmed: u32, normal: u32) -> ThresholdConfig {
        ThresholdConfig {
            initializing,
            confirmed,
            normal,
        }
    }

    /// Feed observations through `decide`, applying each decision.
    fn run(
        mut status: ComponentStatus,
        mut counter: u32,
        observations: &[ComponentStatus],
        t: &ThresholdConfig,
    ) -> (ComponentStatus, u32, usize) {
        let mut commits = 0;
        for &observed in observations {
            match decide(status, counter, observed, t).unwrap() {
                Decision::NoOp => {}
                Decision::Progress { counter: next } => counter = next,
                Decision::Commit { to } => {
                    status = to;
                    counter = 0;
                    commits += 1;
                }
            }
        }
        (status, counter, commits)
    }

    #[test]
    fn initializing_graduates_after_grace_period() {
        let t = thresholds(3, 3, 3);
        assert_eq!(
            decide(Initializing, 0, Confirmed, &t).unwrap(),
            Decision::Progress { counter: 1 }
        );
        assert_eq!(
            decide(Initializing, 1, Normal, &t).unwrap(),
            Decision::Progress { counter: 2 }
        );
        assert_eq!(
            decide(Initializing, 2, Confirmed, &t).unwrap(),
            Decision::Commit { to: Normal }
        );
    }

    #[test]
    fn zero_thresholds_behave_like_one() {
        let t = thresholds(0, 0, 0);
        assert_eq!(
            decide(Initializing, 0, Normal, &t).unwrap(),
            Decision::Commit { to: Normal }
        );
        assert_eq!(
            decide(Normal, 0, Confirmed, &t).unwrap(),
            Decision::Commit { to: Confirmed }
        );
        assert_eq!(
            decide(Perpetrator, 0, Normal, &t).unwrap(),
            Decision::Commit { to: Normal }
        );
    }

    #[test]
    fn same_category_resets_or_noops() {
        let t = thresholds(30, 3, 3);
        assert_eq!(decide(Normal, 0, Normal, &t).unwrap(), Decision::NoOp);
        assert_eq!(
            decide(Normal, 2, Normal, &t).unwrap(),
            Decision::Progress { counter: 0 }
        );
        assert_eq!(decide(Victim, 0, Confirmed, &t).unwrap(), Decision::NoOp);
        assert_eq!(
            decide(Perpetrator, 1, Victim, &t).unwrap(),
            Decision::Progress { counter: 0 }
        );
    }

    #[test]
    fn direction_selects_threshold() {
        let t = thresholds(30, 2, 4);
        assert_eq!(run(Normal, 0, &[Confirmed; 2], &t), (Confirmed, 0, 1));
        assert_eq!(run(Confirmed, 0, &[Normal; 3], &t), (Confirmed, 3, 0));
        assert_eq!(run(Confirmed, 0, &[Normal; 4], &t), (Normal, 0, 1));
    }

    #[test]
    fn initializing_is_not_an_observation() {
        let t = ThresholdConfig::default();
        assert!(matches!(
            decide(Normal, 0, Initializing, &t),
            Err(CausewayError::InvalidStatus { status }) if status == "INITIALIZING"
        ));
    }

    fn abnormal() -> impl Strategy<Value = ComponentStatus> {
        prop::sample::select(ComponentStatus::ANOMALOUS.to_vec())
    }

    proptest! {
        #[test]
        fn exactly_k_abnormal_observations_flip(k in 1u32..10, observed in abnormal()) {
            let t = thresholds(30, k, 3);
            let below = vec![observed; (k - 1) as usize];
            let (status, counter, _) = run(Normal, 0, &below, &t);
            prop_assert_eq!(status, Normal);
            prop_assert_eq!(counter, k - 1);

            let (status, counter, commits) = run(Normal, 0, &vec![observed; k as usize], &t);
            prop_assert_eq!(status, observed);
            prop_assert_eq!(counter, 0);
            prop_assert_eq!(commits, 1);
        }

        #[test]
        fn a_healthy_observation_aborts_the_run(k in 2u32..10, observed in abnormal()) {
            let t = thresholds(30, k, 3);
            let mut observations = vec![observed; (k - 1) as usize];
            observations.push(Normal);
            prop_assert_eq!(run(Normal, 0, &observations, &t), (Normal, 0, 0));
        }

        #[test]
        fn counter_stays_below_threshold(
            k in 1u32..6,
            observations in prop::collection::vec(
                prop::sample::select(vec![Normal, Confirmed, Victim, Perpetrator]), 0..40),
        ) {
            let t = thresholds(5, k, k);
            let (_, counter, _) = run(Initializing, 0, &observations, &t);
            prop_assert!(counter < k.max(5));
        }
    }
}
