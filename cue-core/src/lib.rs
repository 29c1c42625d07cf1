pub mod cue;
pub mod error;
pub mod outcome;
pub mod palette;
pub mod phase;
pub mod ports;
pub mod signal;

pub use cue::{CueEvent, CueRecord};
pub use error::{PaletteError, RigError};
pub use outcome::{MotorPulse, ResponseKind, ResponseOutcome};
pub use palette::{CueColor, CuePalette, NEUTRAL};
pub use phase::RigState;
pub use ports::{AudioCue, CueDisplay, ResponseReporter, SignalPins, StopFlag, StopSignal};
pub use signal::{InputLine, OutputLine};
