//! SPDX-License-Identifier: MIT OR Apache-2.0
//!
//! # RC Servo Tester
//!
//! Control logic for a hobby servo tester: a mode switch selects between a
//! fixed center pulse and a pulse that follows a potentiometer.
//!
//! - **Config:** compile-time peripheral options and servo travel (`config.rs`).
//! - **Sample:** the byte shared between the ADC interrupt and the loop (`sample.rs`).
//! - **FSM:** typed state machine for the Center/Manual modes (`servo_fsm.rs`).
//! - **Control:** the per-iteration read/decide/write step (`control.rs`).
//!
//! Everything here is hardware independent and is unit-tested on the host;
//! the RP2350 binding lives in the firmware binary.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod sample;
pub mod servo_fsm;
pub mod switch;

pub use control::{ControlError, ControlLoop, Step};
pub use sample::AnalogSample;
pub use switch::SwitchPosition;
