use scenario_catalog::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeResolution<'a> {
    pub outcome: &'a Outcome,
    /// Set when the score sits below every threshold and the lowest bucket was used as a
    /// catch-all.
    pub fallback: bool,
}

/// Picks the outcome with the greatest `min` not exceeding `score`, falling back to the lowest
/// bucket. Returns `None` only for an empty outcome list.
#[must_use]
pub fn resolve_outcome(score: i32, outcomes: &[Outcome]) -> Option<OutcomeResolution<'_>> {
    let qualifying = outcomes
        .iter()
        .filter(|outcome| outcome.min <= score)
        .max_by_key(|outcome| outcome.min);

    if let Some(outcome) = qualifying {
        return Some(OutcomeResolution {
            outcome,
            fallback: false,
        });
    }

    outcomes
        .iter()
        .min_by_key(|outcome| outcome.min)
        .map(|outcome| OutcomeResolution {
            outcome,
            fallback: true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(min: i32) -> Outcome {
        Outcome {
            min,
            title: format!("title {min}"),
            message: format!("message {min}"),
        }
    }

    #[test]
    fn picks_greatest_threshold_not_exceeding_score() {
        let outcomes = vec![outcome(-100), outcome(0), outcome(50)];

        let resolved = resolve_outcome(49, &outcomes).expect("bucket exists");
        assert_eq!(resolved.outcome.min, 0);
        assert!(!resolved.fallback);

        assert_eq!(resolve_outcome(50, &outcomes).map(|r| r.outcome.min), Some(50));
        assert_eq!(resolve_outcome(-100, &outcomes).map(|r| r.outcome.min), Some(-100));
    }

    #[test]
    fn order_of_buckets_does_not_matter() {
        let outcomes = vec![outcome(50), outcome(-100), outcome(0)];
        assert_eq!(resolve_outcome(9, &outcomes).map(|r| r.outcome.min), Some(0));
    }

    #[test]
    fn score_below_every_threshold_uses_lowest_bucket() {
        let outcomes = vec![outcome(10), outcome(0)];

        let resolved = resolve_outcome(-7, &outcomes).expect("fallback bucket exists");
        assert_eq!(resolved.outcome.min, 0);
        assert!(resolved.fallback);
    }

    #[test]
    fn empty_outcomes_resolve_to_none() {
        assert!(resolve_outcome(0, &[]).is_none());
    }
}
