pub mod timer;

pub use timer::{MonotonicTimer, Timer, VirtualTimer};
