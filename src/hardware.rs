//! Digital line adapters.
//!
//! [`HalPins`] drives any embedded-hal 1.0 pins (rppal's on the rig).
//! [`SimulatedPins`] stands in on a desk: inputs are latched from the
//! display window's keyboard and the motor only logs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cue_core::{InputLine, OutputLine, RigError, SignalPins};
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use tracing::info;

pub struct HalPins<I: InputPin, O: OutputPin> {
    button_a: I,
    button_b: I,
    sensor: I,
    motor: O,
}

impl<I: InputPin, O: OutputPin> HalPins<I, O> {
    /// Takes already configured pins (inputs pulled down) and drives the
    /// motor low before anything else happens.
    pub fn new(button_a: I, button_b: I, sensor: I, mut motor: O) -> Result<Self, RigError> {
        motor
            .set_low()
            .map_err(|e| RigError::hardware(format!("motor init: {e:?}")))?;
        Ok(Self {
            button_a,
            button_b,
            sensor,
            motor,
        })
    }
}

impl<I: InputPin, O: OutputPin> SignalPins for HalPins<I, O> {
    fn read(&mut self, line: InputLine) -> Result<bool, RigError> {
        let pin = match line {
            InputLine::ButtonA => &mut self.button_a,
            InputLine::ButtonB => &mut self.button_b,
            InputLine::Sensor => &mut self.sensor,
        };
        pin.is_high()
            .map_err(|e| RigError::hardware(format!("{line} read: {e:?}")))
    }

    fn write(&mut self, line: OutputLine, high: bool) -> Result<(), RigError> {
        match line {
            OutputLine::Motor => self
                .motor
                .set_state(PinState::from(high))
                .map_err(|e| RigError::hardware(format!("{line} write: {e:?}"))),
        }
    }

    fn release(&mut self) -> Result<(), RigError> {
        self.write(OutputLine::Motor, false)
    }
}

impl<I: InputPin, O: OutputPin> Drop for HalPins<I, O> {
    fn drop(&mut self) {
        let _ = self.motor.set_low();
    }
}

#[cfg(feature = "rpi")]
pub type RpiPins = HalPins<rppal::gpio::InputPin, rppal::gpio::OutputPin>;

/// Claims the BCM pins in `map`. Inputs get the internal pull-down; the
/// motor starts low. rppal resets each pin's mode when it is dropped.
#[cfg(feature = "rpi")]
pub fn open_rpi_pins(map: &crate::settings::PinMap) -> anyhow::Result<RpiPins> {
    use anyhow::Context;
    use rppal::gpio::Gpio;

    let gpio = Gpio::new().context("cannot open GPIO")?;
    let input = |pin: u8| -> anyhow::Result<rppal::gpio::InputPin> {
        Ok(gpio
            .get(pin)
            .with_context(|| format!("GPIO {pin} unavailable"))?
            .into_input_pulldown())
    };
    let motor = gpio
        .get(map.motor)
        .with_context(|| format!("GPIO {} unavailable", map.motor))?
        .into_output_low();

    info!(
        button_a = map.button_a,
        button_b = map.button_b,
        sensor = map.sensor,
        motor = map.motor,
        "GPIO ready"
    );
    Ok(HalPins::new(
        input(map.button_a)?,
        input(map.button_b)?,
        input(map.sensor)?,
        motor,
    )?)
}

/// Input latches shared between the window (writer) and the pins (reader).
#[derive(Debug, Default)]
pub struct SimulatedLines {
    button_a: AtomicBool,
    button_b: AtomicBool,
    sensor: AtomicBool,
    motor: AtomicBool,
}

impl SimulatedLines {
    fn input(&self, line: InputLine) -> &AtomicBool {
        match line {
            InputLine::ButtonA => &self.button_a,
            InputLine::ButtonB => &self.button_b,
            InputLine::Sensor => &self.sensor,
        }
    }

    /// Marks `line` active until it is next read.
    pub fn latch(&self, line: InputLine) {
        self.input(line).store(true, Ordering::SeqCst);
    }

    pub fn motor_on(&self) -> bool {
        self.motor.load(Ordering::SeqCst)
    }
}

pub struct SimulatedPins {
    lines: Arc<SimulatedLines>,
}

impl SimulatedPins {
    pub fn new(lines: Arc<SimulatedLines>) -> Self {
        Self { lines }
    }
}

impl SignalPins for SimulatedPins {
    fn read(&mut self, line: InputLine) -> Result<bool, RigError> {
        Ok(self.lines.input(line).swap(false, Ordering::SeqCst))
    }

    fn write(&mut self, line: OutputLine, high: bool) -> Result<(), RigError> {
        let was = self.lines.motor.swap(high, Ordering::SeqCst);
        if was != high {
            info!(%line, on = high, "simulated output");
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), RigError> {
        self.write(OutputLine::Motor, false)
    }
}

impl Drop for SimulatedPins {
    fn drop(&mut self) {
        self.lines.motor.store(false, Ordering::SeqCst);
    }
}
