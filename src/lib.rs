#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`CountdownEngine`**: Runs the control loop: periodic gate, input sampling, state machine, rendering
//! - **`Controller`**: The five-state machine with its ordered transition table and menu configuration
//! - **`ElapsedTimer`**: Measures how long a condition has been continuously true
//! - **`InputSampler`**: Turns raw button levels into rising and falling edges once per cycle
//! - **`Command`**: A decoded single-character command from the serial channel
//! - **`ConfigModel`**: Live menu configuration plus the shadow copy used to roll back edits
//! - **`Settings`**: Static engine parameters, validated by `SettingsBuilder`
//! - **`render`**: Pure function from machine state to a logical LED `Frame`
//! - **`ButtonPins`**, **`CommandSource`**, **`LedStrip`**, **`TimeSource`**: Traits to implement for your hardware
//!
//! Time is read from fixed-width wrapping millisecond counters ([`Ticks16`], [`Ticks32`]).
//! All elapsed-time arithmetic is wraparound-safe.

pub mod colors;
pub mod command;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod input;
pub mod render;
pub mod settings;
pub mod time;
pub mod timer;
pub mod types;

pub use colors::{LedColor, Rgb8};
pub use command::{Command, CommandSource};
pub use config::{ConfigModel, Configuration};
pub use engine::{CountdownEngine, Status};
pub use fsm::{Controller, FsmContext, Rule, State};
pub use input::{Button, ButtonPins, InputSampler, Inputs};
pub use render::{Frame, Led, LedStrip, blink, render};
pub use settings::{BlinkRates, Settings, SettingsBuilder};
pub use time::{Millis, Ticks16, Ticks32, TimeInstant, TimeSource};
pub use timer::ElapsedTimer;
pub use types::{Category, Effect, SettingsError};

/// Largest supported number of LEDs in the countdown.
pub const MAX_PIXELS: usize = 8;

/// Largest supported number of countdown units in the duration menu.
pub const MAX_UNITS: usize = 4;
