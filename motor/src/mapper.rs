use crate::{Command, ThresholdError};

/// Score bands calibrated for one trained model.
///
/// Bands are checked in order: below `forward_below` drives forward, below
/// `left_below` turns left, from `right_from` upward turns right. Anything
/// else is [`Mapping::Unmapped`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub forward_below: f32,
    pub left_below: f32,
    pub right_from: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            forward_below: 3.1,
            left_below: 3.2,
            right_from: 3.211,
        }
    }
}

/// Outcome of mapping a score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mapping {
    Command(Command),
    /// The score fell outside every band; `code` is the score truncated
    /// toward zero.
    Unmapped { code: i64 },
}

impl Mapping {
    pub fn command(self) -> Option<Command> {
        match self {
            Mapping::Command(command) => Some(command),
            Mapping::Unmapped { .. } => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mapping::Command(command) => command.label(),
            Mapping::Unmapped { .. } => "unmapped",
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Mapping::Command(command) => command.code(),
            Mapping::Unmapped { code } => code,
        }
    }
}

impl Thresholds {
    pub fn new(forward_below: f32, left_below: f32, right_from: f32) -> Result<Self, ThresholdError> {
        let thresholds = Self {
            forward_below,
            left_below,
            right_from,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        let bounds = [self.forward_below, self.left_below, self.right_from];
        if !bounds.iter().all(|b| b.is_finite()) {
            return Err(ThresholdError::NotFinite);
        }
        if self.forward_below > self.left_below || self.left_below > self.right_from {
            return Err(ThresholdError::Unordered {
                forward_below: self.forward_below,
                left_below: self.left_below,
                right_from: self.right_from,
            });
        }
        Ok(())
    }

    pub fn map(&self, score: f32) -> Mapping {
        if score < self.forward_below {
            Mapping::Command(Command::Forward)
        } else if score >= self.forward_below && score < self.left_below {
            Mapping::Command(Command::Left)
        } else if score >= self.right_from {
            Mapping::Command(Command::Right)
        } else {
            // NaN lands here and casts to 0.
            Mapping::Unmapped {
                code: score.trunc() as i64,
            }
        }
    }
}
