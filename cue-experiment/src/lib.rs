pub mod audio_cycle;
pub mod config;
pub mod state;
pub use audio_cycle::AudioCycleTimer;
pub use config::RigConfig;
pub use state::{InteractionStateMachine, RigPorts, RunSummary};
