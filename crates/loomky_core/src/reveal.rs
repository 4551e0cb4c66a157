//! Reveal state and intersection thresholds

use crate::error::{Result, RevealError};

/// Minimum visible fraction of a region required to count as "entered"
///
/// Always in `(0, 1]`; the range is enforced by [`Threshold::new`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
    /// Generic section reveal: a small slice of the region is enough
    pub const SECTION: Threshold = Threshold(0.15);

    /// Numeric counters wait until half the number is on screen, so the ramp
    /// never starts while only a sliver of it is visible
    pub const COUNTER: Threshold = Threshold(0.5);

    pub fn new(ratio: f32) -> Result<Self> {
        if ratio > 0.0 && ratio <= 1.0 {
            Ok(Self(ratio))
        } else {
            Err(RevealError::InvalidThreshold(ratio))
        }
    }

    pub fn ratio(&self) -> f32 {
        self.0
    }

    /// Whether a measured visible fraction satisfies this threshold
    pub fn is_met_by(&self, fraction: f32) -> bool {
        fraction >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::SECTION
    }
}

/// Presentation state of a revealable region
///
/// `Hidden` is the initial state and `Revealed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

impl RevealState {
    pub fn is_revealed(&self) -> bool {
        matches!(self, RevealState::Revealed)
    }

    /// Apply the visibility event. Returns true only on the actual transition.
    pub fn reveal(&mut self) -> bool {
        match self {
            RevealState::Hidden => {
                *self = RevealState::Revealed;
                true
            }
            RevealState::Revealed => false,
        }
    }

    /// Class name a renderer toggles for the revealed state
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            RevealState::Hidden => None,
            RevealState::Revealed => Some("section-visible"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_range() {
        assert!(Threshold::new(0.15).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert_eq!(Threshold::new(0.0), Err(RevealError::InvalidThreshold(0.0)));
        assert!(Threshold::new(-0.5).is_err());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(f32::NAN).is_err());
    }

    #[test]
    fn test_threshold_comparison() {
        let t = Threshold::COUNTER;
        assert!(!t.is_met_by(0.49));
        assert!(t.is_met_by(0.5));
        assert!(t.is_met_by(1.0));
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut state = RevealState::default();
        assert_eq!(state, RevealState::Hidden);
        assert_eq!(state.class_name(), None);

        assert!(state.reveal());
        assert!(state.is_revealed());
        assert!(!state.reveal());
        assert_eq!(state, RevealState::Revealed);
        assert_eq!(state.class_name(), Some("section-visible"));
    }
}
