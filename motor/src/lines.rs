use std::sync::{Arc, Mutex, PoisonError};

use crate::{ActuatorError, Command};

/// Digital output lines of the dual H-bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    /// Enable, motor A.
    Ena,
    In1,
    In2,
    /// Enable, motor B.
    Enb,
    In3,
    In4,
}

impl Line {
    pub const ALL: [Line; 6] = [Line::Ena, Line::In1, Line::In2, Line::Enb, Line::In3, Line::In4];

    /// BCM pin number on the Raspberry Pi header.
    pub const fn bcm(self) -> u8 {
        match self {
            Line::Ena => 17,
            Line::In1 => 27,
            Line::In2 => 22,
            Line::Enb => 13,
            Line::In3 => 6,
            Line::In4 => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Line::Ena => "ENA",
            Line::In1 => "IN1",
            Line::In2 => "IN2",
            Line::Enb => "ENB",
            Line::In3 => "IN3",
            Line::In4 => "IN4",
        }
    }

    const fn index(self) -> usize {
        match self {
            Line::Ena => 0,
            Line::In1 => 1,
            Line::In2 => 2,
            Line::Enb => 3,
            Line::In3 => 4,
            Line::In4 => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

/// Level of every line, indexed in [`Line::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineStates([Level; 6]);

impl LineStates {
    /// All lines inactive.
    pub const IDLE: LineStates = LineStates([Level::Low; 6]);

    pub fn for_command(command: Command) -> Self {
        use Level::{High as H, Low as L};
        // ENA IN1 IN2 ENB IN3 IN4
        let levels = match command {
            Command::Forward => [H, L, H, H, L, H],
            Command::Backward => [H, H, L, H, H, L],
            Command::Right => [H, L, H, L, L, L],
            Command::Left => [L, L, L, H, L, H],
            Command::Stop => [L; 6],
        };
        Self(levels)
    }

    pub fn level(&self, line: Line) -> Level {
        self.0[line.index()]
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    pub fn iter(&self) -> impl Iterator<Item = (Line, Level)> + '_ {
        Line::ALL.iter().map(move |&line| (line, self.level(line)))
    }
}

/// Driver boundary for the physical output lines.
pub trait Lines: Send {
    fn set(&mut self, line: Line, level: Level) -> Result<(), ActuatorError>;
}

impl<L: Lines + ?Sized> Lines for Box<L> {
    fn set(&mut self, line: Line, level: Level) -> Result<(), ActuatorError> {
        (**self).set(line, level)
    }
}

/// [`Lines`] implementation that only logs each write.
#[derive(Clone, Debug, Default)]
pub struct LoggingLines;

impl Lines for LoggingLines {
    fn set(&mut self, line: Line, level: Level) -> Result<(), ActuatorError> {
        log::trace!("line {} (gpio {}) -> {:?}", line.name(), line.bcm(), level);
        Ok(())
    }
}

/// In-memory lines that remember every write. Clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct MemoryLines {
    writes: Arc<Mutex<Vec<(Line, Level)>>>,
}

impl MemoryLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, oldest first.
    pub fn writes(&self) -> Vec<(Line, Level)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current level of every line; lines never written read as low.
    pub fn levels(&self) -> LineStates {
        let mut levels = [Level::Low; 6];
        for (line, level) in self.writes.lock().unwrap_or_else(PoisonError::into_inner).iter() {
            levels[line.index()] = *level;
        }
        LineStates(levels)
    }
}

impl Lines for MemoryLines {
    fn set(&mut self, line: Line, level: Level) -> Result<(), ActuatorError> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).push((line, level));
        Ok(())
    }
}
