use std::fmt;

/// Discrete driving directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Left,
    Right,
    Backward,
    Stop,
}

impl Command {
    /// Name used in debug artifact file names and sequence logs.
    pub const fn label(self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Left => "left",
            Command::Right => "right",
            Command::Backward => "backward",
            Command::Stop => "stop",
        }
    }

    /// Numeric code; 1, 2 and 3 are the classifier's command codes.
    pub const fn code(self) -> i64 {
        match self {
            Command::Stop => 0,
            Command::Forward => 1,
            Command::Left => 2,
            Command::Right => 3,
            Command::Backward => 4,
        }
    }

    /// Keyboard token used while recording: `w`, `a`, `s`, `d` and `x`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(Command::Forward),
            "a" => Some(Command::Left),
            "s" => Some(Command::Backward),
            "d" => Some(Command::Right),
            "x" => Some(Command::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
