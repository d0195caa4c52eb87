//! Reset Handling
//!
//! First thing the firmware runs, before clocks, peripherals or interrupts are
//! set up.

use rp235x_hal as hal;
use hal::pac;

/// Why the chip last came out of reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum ResetCause {
    /// Power-on, brown-out or the RUN pin.
    PowerOn,
    WatchdogTimeout,
    /// Software or debugger reboot through the watchdog.
    WatchdogForced,
}

/// Puts the core in a known state after any kind of reset.
///
/// 1. Masks interrupts globally.
/// 2. Reads the watchdog `REASON` register. It is read-only on the RP2350 and
///    cleared by the hardware on the next reset, so reading it here is what
///    consumes it.
/// 3. Stops the watchdog, which keeps counting across a soft reset.
pub fn on_reset() -> ResetCause {
    cortex_m::interrupt::disable();

    unsafe {
        let watchdog = &(*pac::WATCHDOG::ptr());

        let reason = watchdog.reason().read();
        let cause = if reason.force().bit_is_set() {
            ResetCause::WatchdogForced
        } else if reason.timer().bit_is_set() {
            ResetCause::WatchdogTimeout
        } else {
            ResetCause::PowerOn
        };

        watchdog.ctrl().modify(|_, w| w.enable().clear_bit());

        cause
    }
}
