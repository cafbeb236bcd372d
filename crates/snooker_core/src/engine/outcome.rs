//! Shot Outcome Classifier.
//!
//! Boundary glue between the physics engine and the rules machine: once the
//! table has settled, the collision tracker reports which balls dropped and
//! which ball the cue ball touched first, and [`classify`] packages that
//! into a [`ShotOutcome`]. No legality or scoring judgment happens here;
//! that is the state machine's job.

use serde::{Deserialize, Serialize};

use crate::engine::ball::BallId;

/// Structured record of one completed physical shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotOutcome {
    /// Balls that fell in this shot. Order is irrelevant; duplicates are
    /// collapsed.
    pub potted: Vec<BallId>,
    /// First ball the cue ball contacted, or `None` for a total miss.
    pub first_contact: Option<BallId>,
    /// Derived from `potted`; kept explicit because the foul precheck reads
    /// it on every shot.
    pub cue_ball_potted: bool,
}

impl ShotOutcome {
    /// A shot where nothing was hit and nothing dropped.
    pub fn miss() -> Self {
        Self {
            potted: Vec::new(),
            first_contact: None,
            cue_ball_potted: false,
        }
    }

    pub fn reds_potted(&self) -> usize {
        self.potted.iter().filter(|id| id.is_red()).count()
    }

    pub fn colours_potted(&self) -> impl Iterator<Item = BallId> + '_ {
        self.potted.iter().copied().filter(|id| id.is_colour())
    }
}

/// Pure transform from the physics boundary's raw report to a
/// [`ShotOutcome`]. Called exactly once per settled shot.
pub fn classify(potted: &[BallId], first_contact: Option<BallId>) -> ShotOutcome {
    let mut deduped: Vec<BallId> = Vec::with_capacity(potted.len());
    for &id in potted {
        if !deduped.contains(&id) {
            deduped.push(id);
        }
    }
    let cue_ball_potted = deduped.iter().any(|id| id.is_cue());
    ShotOutcome {
        potted: deduped,
        first_contact,
        cue_ball_potted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ball::BallColour;

    #[test]
    fn test_classify_derives_cue_flag() {
        let outcome = classify(&[BallId::Red(1), BallId::Cue], Some(BallId::Red(1)));
        assert!(outcome.cue_ball_potted);
        assert_eq!(outcome.potted.len(), 2);

        let outcome = classify(&[BallId::Red(1)], Some(BallId::Red(1)));
        assert!(!outcome.cue_ball_potted);
    }

    #[test]
    fn test_classify_collapses_duplicates() {
        let outcome = classify(&[BallId::Red(2), BallId::Red(2)], Some(BallId::Red(2)));
        assert_eq!(outcome.potted, vec![BallId::Red(2)]);
    }

    #[test]
    fn test_classify_is_pure() {
        let potted = [BallId::Colour(BallColour::Blue)];
        let a = classify(&potted, Some(BallId::Colour(BallColour::Blue)));
        let b = classify(&potted, Some(BallId::Colour(BallColour::Blue)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_counting_helpers() {
        let outcome = classify(
            &[
                BallId::Red(0),
                BallId::Red(4),
                BallId::Colour(BallColour::Pink),
            ],
            Some(BallId::Red(0)),
        );
        assert_eq!(outcome.reds_potted(), 2);
        assert_eq!(
            outcome.colours_potted().collect::<Vec<_>>(),
            vec![BallId::Colour(BallColour::Pink)]
        );
    }
}
