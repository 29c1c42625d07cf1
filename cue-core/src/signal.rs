use std::fmt;

/// Active-high digital inputs wired to the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    /// Pessimistic response button.
    ButtonA,
    /// Optimistic response button.
    ButtonB,
    /// Animal presence sensor.
    Sensor,
}

/// Active-high digital outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLine {
    Motor,
}

impl fmt::Display for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ButtonA => "button A",
            Self::ButtonB => "button B",
            Self::Sensor => "sensor",
        })
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("motor")
    }
}
