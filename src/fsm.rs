//! Countdown state machine with an ordered transition table.
//!
//! Each cycle the [`Controller`] walks [`Controller::TRANSITIONS`] from top to
//! bottom and runs the action of the first rule whose guard matches. Guards
//! overlap on purpose (a pause request and the countdown expiry can both be
//! true in the same cycle), so the order of the table is part of the
//! behavior.

use crate::command::Command;
use crate::config::{ConfigModel, Configuration};
use crate::input::Inputs;
use crate::settings::Settings;
use crate::time::{Millis, TimeInstant};
use crate::timer::ElapsedTimer;
use crate::types::SettingsError;

/// Machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Idle, strip dark.
    Start,
    /// LEDs running out one unit at a time.
    Countdown,
    /// Countdown paused, remaining LEDs blink slowly.
    Freeze,
    /// Countdown over, the whole strip blinks red.
    Blink,
    /// Configuration menu.
    Config,
}

impl State {
    /// Upper-case name used in the status line.
    pub const fn name(self) -> &'static str {
        match self {
            State::Start => "START",
            State::Countdown => "COUNTDOWN",
            State::Freeze => "FREEZE",
            State::Blink => "BLINK",
            State::Config => "CONFIG",
        }
    }
}

/// Identifies the transition rule that fired in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rule {
    /// START → COUNTDOWN.
    Start,
    /// COUNTDOWN → FREEZE.
    Pause,
    /// COUNTDOWN → BLINK, by request or because the time ran out.
    Expire,
    /// FREEZE → COUNTDOWN.
    Resume,
    /// BLINK → START.
    Rearm,
    /// CONFIG → START, edits discarded.
    CancelMenu,
    /// CONFIG → START, edits kept.
    CommitMenu,
    /// Any state but CONFIG → CONFIG.
    OpenMenu,
    /// Fast-forward the countdown by one unit.
    SkipUnit,
    /// Menu: next category.
    NextCategory,
    /// Menu: next option in the active category.
    NextOption,
    /// Menu: explicit option from a command symbol.
    DirectSet,
}

/// State bookkeeping: current state, requested state, and entry time.
#[derive(Debug, Clone, Copy)]
pub struct FsmContext<I: TimeInstant> {
    state: State,
    pending_state: State,
    entered_at: I,
    time_in_state: Millis,
}

impl<I: TimeInstant> FsmContext<I> {
    /// Creates a context in `START`, entered at `now`.
    pub fn new(now: I) -> Self {
        Self {
            state: State::Start,
            pending_state: State::Start,
            entered_at: now,
            time_in_state: Millis::ZERO,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Clock reading at which the current state was entered.
    pub fn entered_at(&self) -> I {
        self.entered_at
    }

    /// Time spent in the current state as of the last update.
    pub fn time_in_state(&self) -> Millis {
        self.time_in_state
    }

    /// Recomputes time-in-state from the entry time.
    pub fn update_time_in_state(&mut self, now: I) {
        self.time_in_state = now.duration_since(self.entered_at);
    }

    /// Requests `next` and commits it if it differs from the current state.
    ///
    /// A commit resets the entry time to `now` and time-in-state to zero.
    /// Returns true if the state changed.
    pub fn set_state(&mut self, next: State, now: I) -> bool {
        self.pending_state = next;
        if self.pending_state == self.state {
            return false;
        }

        self.state = self.pending_state;
        self.entered_at = now;
        self.time_in_state = Millis::ZERO;
        true
    }

    /// Moves the entry time so that time-in-state equals `elapsed` at `now`.
    pub fn rewind(&mut self, elapsed: Millis, now: I) {
        self.entered_at = now.wrapping_sub(elapsed);
        self.update_time_in_state(now);
    }

    /// Pulls the entry time back by `step`, so time-in-state grows by `step`.
    pub fn fast_forward(&mut self, step: Millis, now: I) {
        self.entered_at = self.entered_at.wrapping_sub(step);
        self.update_time_in_state(now);
    }
}

type Guard<I> = fn(&Controller<I>, &Inputs) -> bool;
type Action<I> = fn(&mut Controller<I>, &Inputs, I);

/// One row of the transition table.
pub struct Transition<I: TimeInstant> {
    /// Rule reported when this row fires.
    pub rule: Rule,
    guard: Guard<I>,
    action: Action<I>,
}

/// The countdown controller: state machine, menu configuration and the
/// sustained-More timer.
#[derive(Debug, Clone)]
pub struct Controller<I: TimeInstant> {
    fsm: FsmContext<I>,
    prev_tis: Millis,
    config: ConfigModel,
    more_timer: ElapsedTimer<I>,
    unit: Millis,
    settings: Settings,
}

impl<I: TimeInstant> Controller<I> {
    /// Transition rules in priority order. The first matching guard wins.
    pub const TRANSITIONS: [Transition<I>; 12] = [
        Transition {
            rule: Rule::Start,
            guard: Self::start_requested,
            action: Self::enter_countdown,
        },
        Transition {
            rule: Rule::Pause,
            guard: Self::pause_requested,
            action: Self::pause,
        },
        Transition {
            rule: Rule::Expire,
            guard: Self::countdown_over,
            action: Self::enter_blink,
        },
        Transition {
            rule: Rule::Resume,
            guard: Self::resume_requested,
            action: Self::resume,
        },
        Transition {
            rule: Rule::Rearm,
            guard: Self::alarm_over,
            action: Self::enter_start,
        },
        Transition {
            rule: Rule::CancelMenu,
            guard: Self::cancel_requested,
            action: Self::cancel_menu,
        },
        Transition {
            rule: Rule::CommitMenu,
            guard: Self::commit_requested,
            action: Self::commit_menu,
        },
        Transition {
            rule: Rule::OpenMenu,
            guard: Self::menu_requested,
            action: Self::open_menu,
        },
        Transition {
            rule: Rule::SkipUnit,
            guard: Self::skip_requested,
            action: Self::skip_unit,
        },
        Transition {
            rule: Rule::NextCategory,
            guard: Self::next_category_requested,
            action: Self::next_category,
        },
        Transition {
            rule: Rule::NextOption,
            guard: Self::next_option_requested,
            action: Self::next_option,
        },
        Transition {
            rule: Rule::DirectSet,
            guard: Self::direct_set_requested,
            action: Self::direct_set,
        },
    ];

    /// Creates a controller in `START` with the default configuration.
    ///
    /// # Errors
    /// Returns `ExceedsClockRange` if the longest countdown, the alarm or the
    /// long press would outlast the wrap period of `I`.
    pub fn new(settings: Settings, now: I) -> Result<Self, SettingsError> {
        settings.check_clock_range::<I>()?;

        let config = ConfigModel::new(settings.unit_count());
        let unit = settings.unit(config.live().duration_index());

        Ok(Self {
            fsm: FsmContext::new(now),
            prev_tis: Millis::ZERO,
            config,
            more_timer: ElapsedTimer::new(),
            unit,
            settings,
        })
    }

    /// Runs one control cycle over this cycle's inputs.
    ///
    /// Updates the sustained-More timer and time-in-state, evaluates the
    /// transition table, then refreshes the countdown unit from the duration
    /// option. Returns the rule that fired, if any.
    pub fn process(&mut self, inputs: &Inputs, now: I) -> Option<Rule> {
        let more_active = inputs.more_held || inputs.command == Command::More;
        self.more_timer.update(now, more_active);
        self.fsm.update_time_in_state(now);

        let mut fired = None;
        for transition in Self::TRANSITIONS.iter() {
            if (transition.guard)(self, inputs) {
                #[cfg(feature = "defmt")]
                let from = self.fsm.state();

                (transition.action)(self, inputs, now);
                fired = Some(transition.rule);

                #[cfg(feature = "defmt")]
                defmt::debug!("{}: {} -> {}", transition.rule, from, self.fsm.state());
                break;
            }
        }

        self.unit = self.settings.unit(self.config.live().duration_index());
        fired
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.fsm.state()
    }

    /// Time spent in the current state as of the last cycle.
    pub fn time_in_state(&self) -> Millis {
        self.fsm.time_in_state()
    }

    /// Time-in-state saved when the countdown was last paused.
    pub fn prev_tis(&self) -> Millis {
        self.prev_tis
    }

    /// State bookkeeping, including the entry time.
    pub fn fsm(&self) -> &FsmContext<I> {
        &self.fsm
    }

    /// Live configuration.
    pub fn config(&self) -> &Configuration {
        self.config.live()
    }

    /// Live configuration together with its rollback copy.
    pub fn config_model(&self) -> &ConfigModel {
        &self.config
    }

    /// Per-LED countdown duration currently in effect.
    pub fn unit(&self) -> Millis {
        self.unit
    }

    /// Full countdown length: one unit per LED.
    pub fn countdown_length(&self) -> Millis {
        self.unit.saturating_mul(self.settings.pixel_count() as u32)
    }

    /// Settings the controller was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Timer measuring how long More has been held.
    pub fn more_timer(&self) -> &ElapsedTimer<I> {
        &self.more_timer
    }

    fn in_state(&self, state: State) -> bool {
        self.fsm.state() == state
    }

    fn long_press_elapsed(&self) -> bool {
        self.more_timer.has_reached(self.settings.long_press())
    }

    // Guards

    fn start_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Start) && (inputs.go_rising || inputs.command == Command::Go)
    }

    fn pause_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Countdown) && (inputs.esc_rising || inputs.command == Command::Pause)
    }

    fn countdown_over(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Countdown)
            && (inputs.go_rising
                || inputs.command == Command::Go
                || self.fsm.time_in_state() >= self.countdown_length())
    }

    fn resume_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Freeze) && (inputs.esc_rising || inputs.command == Command::Resume)
    }

    fn alarm_over(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Blink)
            && (inputs.go_rising
                || inputs.command == Command::Go
                || self.fsm.time_in_state() >= self.settings.blink_duration())
    }

    fn cancel_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Config) && (inputs.esc_rising || inputs.command == Command::Cancel)
    }

    fn commit_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Config)
            && (self.long_press_elapsed() || inputs.command == Command::Save)
    }

    fn menu_requested(&self, inputs: &Inputs) -> bool {
        !self.in_state(State::Config)
            && (self.long_press_elapsed() || inputs.command == Command::Config)
    }

    fn skip_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Countdown) && (inputs.more_falling || inputs.command == Command::More)
    }

    fn next_category_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Config) && (inputs.more_rising || inputs.command == Command::More)
    }

    fn next_option_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Config) && (inputs.go_rising || inputs.command == Command::Go)
    }

    fn direct_set_requested(&self, inputs: &Inputs) -> bool {
        self.in_state(State::Config)
            && matches!(
                inputs.command.direct_set(),
                Some((category, _)) if category == self.config.live().active_category()
            )
    }

    // Actions

    fn enter_countdown(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.set_state(State::Countdown, now);
    }

    fn pause(&mut self, _inputs: &Inputs, now: I) {
        self.prev_tis = self.fsm.time_in_state();
        self.fsm.set_state(State::Freeze, now);
    }

    fn enter_blink(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.set_state(State::Blink, now);
    }

    fn resume(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.set_state(State::Countdown, now);
        self.fsm.rewind(self.prev_tis, now);
    }

    fn enter_start(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.set_state(State::Start, now);
    }

    fn cancel_menu(&mut self, _inputs: &Inputs, now: I) {
        self.config.rollback();
        self.fsm.set_state(State::Start, now);
    }

    fn commit_menu(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.set_state(State::Start, now);
        self.more_timer.reset();
        #[cfg(feature = "defmt")]
        defmt::info!("config saved: {}", self.config.live().options());
    }

    fn open_menu(&mut self, _inputs: &Inputs, now: I) {
        self.config.snapshot();
        self.fsm.set_state(State::Config, now);
        self.more_timer.reset();
    }

    fn skip_unit(&mut self, _inputs: &Inputs, now: I) {
        self.fsm.fast_forward(self.unit, now);
    }

    fn next_category(&mut self, _inputs: &Inputs, _now: I) {
        self.config.live_mut().advance_category();
    }

    fn next_option(&mut self, _inputs: &Inputs, _now: I) {
        let live = self.config.live_mut();
        let category = live.active_category();
        live.advance(category);
    }

    fn direct_set(&mut self, inputs: &Inputs, _now: I) {
        if let Some((category, value)) = inputs.command.direct_set() {
            self.config.live_mut().set(category, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Ticks32;

    #[test]
    fn set_state_commits_only_on_change() {
        let mut fsm = FsmContext::new(Ticks32(0));
        fsm.update_time_in_state(Ticks32(300));
        assert!(!fsm.set_state(State::Start, Ticks32(300)));
        assert_eq!(fsm.time_in_state(), Millis(300));

        assert!(fsm.set_state(State::Countdown, Ticks32(400)));
        assert_eq!(fsm.entered_at(), Ticks32(400));
        assert_eq!(fsm.time_in_state(), Millis::ZERO);
    }

    #[test]
    fn fast_forward_adds_to_time_in_state() {
        let mut fsm = FsmContext::new(Ticks32(1000));
        fsm.fast_forward(Millis(500), Ticks32(1200));
        assert_eq!(fsm.entered_at(), Ticks32(500));
        assert_eq!(fsm.time_in_state(), Millis(700));
    }

    #[test]
    fn rewind_restores_elapsed() {
        let mut fsm = FsmContext::new(Ticks32(0));
        fsm.rewind(Millis(2500), Ticks32(9000));
        assert_eq!(fsm.entered_at(), Ticks32(6500));
        assert_eq!(fsm.time_in_state(), Millis(2500));
    }

    #[test]
    fn table_order_is_fixed() {
        let rules: [Rule; 12] = core::array::from_fn(|i| Controller::<Ticks32>::TRANSITIONS[i].rule);
        assert_eq!(
            rules,
            [
                Rule::Start,
                Rule::Pause,
                Rule::Expire,
                Rule::Resume,
                Rule::Rearm,
                Rule::CancelMenu,
                Rule::CommitMenu,
                Rule::OpenMenu,
                Rule::SkipUnit,
                Rule::NextCategory,
                Rule::NextOption,
                Rule::DirectSet,
            ]
        );
    }
}
