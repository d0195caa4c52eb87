//! # Servo Tester with ADC Interrupt
//!
//! Drives a hobby RC servo from GPIO0:
//! - **Switch open (GPIO1 high):** servo parked at the 1.5 ms center pulse.
//! - **Switch closed (GPIO1 low):** servo follows the potentiometer on GPIO26,
//!   between 1.0 ms and 2.0 ms.
//!
//! - **Reset Module:** watchdog and reset-cause handling (`reset.rs`).
//! - **Hardware Module:** HAL setup for clocks, PWM, ADC and GPIO (`hardware.rs`).
//! - **Control Loop:** typed state machine from the library crate.
//!
//! Target: Raspberry Pi Pico 2 (RP2350).

// --- Imports ---
use defmt::*;
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use panic_probe as _;

use servo_tester::config::{SERVO_TRAVEL, SETTLE_DELAY_MS};
use servo_tester::{AnalogSample, ControlError, ControlLoop};

// --- Modules ---
mod hardware;
mod reset;

// --- HAL Selection ---
use rp235x_hal as hal;
use hal::entry;
use hal::pac;

use rp235x_hal::pac::interrupt;

// --- Bootloader Configuration ---

#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

// --- Shared State ---

// Latest potentiometer reading, written only by ADC_IRQ_FIFO
static ANALOG_SAMPLE: AnalogSample = AnalogSample::new();

/// Entry point.
#[entry]
fn main() -> ! {
    // 1. Interrupts off, reset cause consumed, watchdog stopped
    let cause = reset::on_reset();
    info!("Program start, reset cause: {}", cause);

    // 2. Initialize Hardware Stack (Clocks, PWM at center, free-running ADC, GPIO)
    let hardware::Hardware {
        mut timer,
        mode_switch,
        servo,
        potentiometer: _potentiometer,
    } = hardware::init();

    // 3. Application state; nothing is written to the PWM until the first step
    let mut control = ControlLoop::new(mode_switch, servo, &ANALOG_SAMPLE, SERVO_TRAVEL);

    // 4. Let conversions reach the sample
    unsafe { cortex_m::interrupt::enable() };

    // 5. Give the servo time to reach center before any mode logic
    timer.delay_ms(SETTLE_DELAY_MS);
    info!("Settled, control loop running");

    // 6. Main Application Loop
    loop {
        match control.step() {
            Ok(step) => {
                if step.mode_changed {
                    info!("Mode: {} (compare {})", step.position, step.written);
                }
            }
            Err(ControlError::Switch(never)) => match never {},
            Err(ControlError::Pwm(never)) => match never {},
        }
    }
}

// --- Interrupt Handlers ---

#[allow(non_snake_case)]
#[interrupt]
fn ADC_IRQ_FIFO() {
    let adc_regs = unsafe { &(*pac::ADC::ptr()) };

    // Drain the FIFO so every finished conversion lands in the sample
    while adc_regs.fcs().read().level().bits() > 0 {
        let value = adc_regs.fifo().read().val().bits();
        ANALOG_SAMPLE.store(value as u8);
    }
}

// --- Metadata ---

#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [hal::binary_info::EntryAddr; 4] = [
    hal::binary_info::rp_cargo_bin_name!(),
    hal::binary_info::rp_cargo_version!(),
    hal::binary_info::rp_program_description!(c"RC Servo Tester"),
    hal::binary_info::rp_program_build_attribute!()
];
