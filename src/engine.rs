//! Cooperative control loop tying inputs, state machine and strip together.
//!
//! Provides [`CountdownEngine`], which owns the hardware seams and runs one
//! full control cycle every control period. The period is measured with an
//! [`ElapsedTimer`] instead of sleeping, so [`poll`](CountdownEngine::poll)
//! can be called from a busy main loop as often as convenient.

use core::fmt::{self, Write};

use crate::command::CommandSource;
use crate::config::Configuration;
use crate::fsm::{Controller, Rule, State};
use crate::input::{ButtonPins, InputSampler, Inputs};
use crate::render::{Frame, LedStrip, render};
use crate::settings::Settings;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::ElapsedTimer;
use crate::types::SettingsError;
use heapless::String;

/// Runs the countdown on real (or mocked) hardware.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `P` - Button GPIO implementation type
/// * `C` - Command source implementation type
/// * `S` - LED strip implementation type
pub struct CountdownEngine<'t, I, T, P, C, S>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: ButtonPins,
    C: CommandSource,
    S: LedStrip,
{
    time_source: &'t T,
    pins: P,
    commands: C,
    strip: S,
    sampler: InputSampler,
    gate: ElapsedTimer<I>,
    controller: Controller<I>,
    frame: Frame,
    last_inputs: Inputs,
    last_rule: Option<Rule>,
}

impl<'t, I, T, P, C, S> CountdownEngine<'t, I, T, P, C, S>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: ButtonPins,
    C: CommandSource,
    S: LedStrip,
{
    /// Creates an engine in `START` with the strip turned off.
    ///
    /// # Errors
    /// Returns `ExceedsClockRange` if `settings` describe timings that the
    /// clock type `I` cannot measure. The strip is left untouched in that case.
    pub fn new(
        pins: P,
        commands: C,
        mut strip: S,
        time_source: &'t T,
        settings: Settings,
    ) -> Result<Self, SettingsError> {
        let now = time_source.now();
        let frame = Frame::dark(settings.pixel_count());
        let controller = Controller::new(settings, now)?;

        strip.clear();
        strip.show();

        Ok(Self {
            time_source,
            pins,
            commands,
            strip,
            sampler: InputSampler::new(),
            gate: ElapsedTimer::new(),
            controller,
            frame,
            last_inputs: Inputs::default(),
            last_rule: None,
        })
    }

    /// Runs a control cycle if a full control period has passed since the
    /// previous one.
    ///
    /// Returns true if a cycle ran.
    pub fn poll(&mut self) -> bool {
        let now = self.time_source.now();
        self.gate.update(now, true);
        if !self.gate.has_reached(self.controller.settings().control_period()) {
            return false;
        }

        self.gate.reset();
        self.run_cycle(now);
        true
    }

    /// Runs one control cycle unconditionally: sample inputs, evaluate the
    /// transition table, render and present the frame.
    pub fn run_cycle(&mut self, now: I) {
        let inputs = self.sampler.poll(&mut self.pins, &mut self.commands);
        self.last_rule = self.controller.process(&inputs, now);
        self.last_inputs = inputs;

        self.frame = render(
            self.controller.state(),
            self.controller.time_in_state(),
            self.controller.prev_tis(),
            self.controller.config(),
            self.controller.settings(),
        );
        self.frame.present(&mut self.strip);
    }

    /// Current machine state.
    pub fn state(&self) -> State {
        self.controller.state()
    }

    /// The state machine driving the strip.
    pub fn controller(&self) -> &Controller<I> {
        &self.controller
    }

    /// The frame presented in the latest cycle.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Inputs consumed in the latest cycle.
    pub fn last_inputs(&self) -> &Inputs {
        &self.last_inputs
    }

    /// Rule that fired in the latest cycle, if any.
    pub fn last_rule(&self) -> Option<Rule> {
        self.last_rule
    }

    /// Mutable access to the button pins.
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Mutable access to the command source.
    pub fn commands_mut(&mut self) -> &mut C {
        &mut self.commands
    }

    /// The LED strip the frames are presented on.
    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Diagnostic view of the latest cycle.
    pub fn status(&self) -> Status<'_> {
        Status {
            state: self.controller.state(),
            config: self.controller.config(),
            frame: &self.frame,
        }
    }

    /// Renders the status line into a fixed-capacity string.
    ///
    /// Output that does not fit in `L` bytes is cut off.
    pub fn status_line<const L: usize>(&self) -> String<L> {
        let mut line = String::new();
        let _ = write!(line, "{}", self.status());
        line
    }
}

/// Human-readable snapshot of one cycle, for diagnostics only.
///
/// Formats as the state name, the active category and option, the option
/// vector, then `on:intensity:(r,g,b)` for every logical LED.
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    /// Machine state after the cycle.
    pub state: State,
    /// Live configuration.
    pub config: &'a Configuration,
    /// Frame presented in the cycle.
    pub frame: &'a Frame,
}

impl fmt::Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [duration, effect, color] = self.config.options();
        write!(
            f,
            "{} cat={} opt={} opts=[{},{},{}] |",
            self.state.name(),
            self.config.active_category().index(),
            self.config.active_option(),
            duration,
            effect,
            color,
        )?;

        for led in self.frame.leds() {
            write!(
                f,
                " {}:{}:({},{},{})",
                u8::from(led.on),
                led.intensity,
                led.rgb.red,
                led.rgb.green,
                led.rgb.blue,
            )?;
        }
        Ok(())
    }
}
