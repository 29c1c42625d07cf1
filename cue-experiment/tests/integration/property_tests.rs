use std::time::Duration;

use cue_core::{CuePalette, InputLine, ResponseOutcome};
use cue_timing::VirtualTimer;
use proptest::prelude::*;

use crate::mock_rig::{DeadlineStop, Frame, ScriptedPins, build_rig, ms};

const TICK_MS: u64 = 100;
const WINDOW_MS: u64 = 30_000;
const HOLD_MS: u64 = 200;

/// First poll tick (cue opened at t=0) that sees a press starting at `at_ms`.
fn seen_at(at_ms: Option<u64>) -> Option<u64> {
    at_ms
        .map(|t| t.div_ceil(TICK_MS) * TICK_MS)
        .filter(|&tick| tick <= WINDOW_MS)
}

fn expected(a_ms: Option<u64>, b_ms: Option<u64>) -> (ResponseOutcome, u64) {
    match (seen_at(a_ms), seen_at(b_ms)) {
        (Some(a), Some(b)) if a <= b => (ResponseOutcome::Pessimistic, a),
        (Some(a), None) => (ResponseOutcome::Pessimistic, a),
        (_, Some(b)) => (ResponseOutcome::Optimistic, b),
        (None, None) => (ResponseOutcome::Timeout, WINDOW_MS),
    }
}

proptest! {
    /// Every cue window ends with exactly one outcome, chosen by the first
    /// tick that sees a press (A before B), otherwise by the deadline.
    #[test]
    fn every_cue_has_exactly_one_outcome(
        a_ms in proptest::option::of(0u64..40_000),
        b_ms in proptest::option::of(0u64..40_000),
        seed in any::<u64>(),
    ) {
        let timer = VirtualTimer::new();
        let mut pins = ScriptedPins::new(timer.clone())
            .active(InputLine::Sensor, ms(0)..ms(50));
        if let Some(a) = a_ms {
            pins = pins.active(InputLine::ButtonA, ms(a)..ms(a + HOLD_MS));
        }
        if let Some(b) = b_ms {
            pins = pins.active(InputLine::ButtonB, ms(b)..ms(b + HOLD_MS));
        }
        let mut rig = build_rig(&timer, pins, DeadlineStop::never(timer.clone()), seed);

        rig.start().unwrap();
        let record = rig.tick().unwrap().expect("cue window");
        let (outcome, at_ms) = expected(a_ms, b_ms);

        prop_assert_eq!(record.outcome, outcome);
        prop_assert_eq!(record.decided_at, ms(at_ms));
        prop_assert_eq!(rig.summary.cues(), 1);

        let reports = rig.ports.reporter.reports.len();
        let pulses = rig.ports.pins.pulses();
        match outcome {
            ResponseOutcome::Timeout => {
                prop_assert_eq!(reports, 0);
                prop_assert!(pulses.is_empty());
            }
            ResponseOutcome::Pessimistic => {
                prop_assert_eq!(reports, 1);
                prop_assert_eq!(pulses, vec![(ms(at_ms), Duration::from_secs(5))]);
            }
            ResponseOutcome::Optimistic => {
                prop_assert_eq!(reports, 1);
                prop_assert_eq!(pulses, vec![(ms(at_ms), Duration::from_secs(15))]);
            }
        }
    }

    /// Whatever color is drawn, it comes from the palette and the screen is
    /// neutral again once the window closes.
    #[test]
    fn cue_color_is_from_palette_and_screen_returns_to_neutral(
        seed in any::<u64>(),
        press_ms in proptest::option::of(0u64..35_000),
    ) {
        let timer = VirtualTimer::new();
        let mut pins = ScriptedPins::new(timer.clone())
            .active(InputLine::Sensor, ms(0)..ms(50));
        if let Some(p) = press_ms {
            pins = pins.active(InputLine::ButtonB, ms(p)..ms(p + HOLD_MS));
        }
        let mut rig = build_rig(&timer, pins, DeadlineStop::never(timer.clone()), seed);

        rig.start().unwrap();
        let record = rig.tick().unwrap().expect("cue window");

        prop_assert!(CuePalette::default().contains(&record.color));
        prop_assert_eq!(rig.ports.display.cues_shown(), vec![record.color]);
        prop_assert_eq!(rig.ports.display.current(), Some(Frame::Neutral));
    }
}

#[test]
fn every_palette_color_gets_drawn() {
    let timer = VirtualTimer::new();
    let pins = ScriptedPins::new(timer.clone());
    let mut rig = build_rig(&timer, pins, DeadlineStop::never(timer.clone()), 42);

    let mut seen = Vec::new();
    for _ in 0..200 {
        let event = rig.begin_cue().unwrap();
        if !seen.contains(&event.color) {
            seen.push(event.color);
        }
    }
    assert_eq!(seen.len(), rig.palette.len());
}
