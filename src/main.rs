//! SPDX-License-Identifier: MIT OR Apache-2.0
//!
//! RC servo tester firmware for the Raspberry Pi Pico 2 (RP2350).
//!
//! Host builds carry no firmware; the control logic in the library is what gets
//! built and tested there.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware;

#[cfg(not(target_os = "none"))]
fn main() {}
