//! Compile-time configuration
//!
//! Every peripheral option the firmware relies on is described here as a named
//! structure of enumerated values. The derived register values (PWM divider and
//! TOP, ADC conversion interval, compare values for the servo travel) are
//! computed by `const fn`s and checked with `const` assertions, so an
//! inconsistent configuration is a build error rather than a misbehaving servo.

/// System clock produced by the PLL setup in the firmware (RP2350 default).
pub const SYS_CLOCK_HZ: u32 = 150_000_000;

/// ADC clock, sourced from the 48 MHz USB PLL.
pub const ADC_CLOCK_HZ: u32 = 48_000_000;

/// Busy-wait after boot that lets the servo physically reach center.
pub const SETTLE_DELAY_MS: u32 = 2_000;

// --- PWM ---

/// How the PWM counter walks between zero and TOP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum CountMode {
    /// Count up to TOP, then wrap to zero. Output is cleared on compare match.
    Sawtooth,
    /// Count up to TOP and back down. Halves the effective counter rate.
    PhaseCorrect,
}

impl CountMode {
    const fn steps_per_count(self) -> u32 {
        match self {
            CountMode::Sawtooth => 1,
            CountMode::PhaseCorrect => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Polarity {
    /// Output high from counter reset until compare match.
    NonInverted,
    Inverted,
}

/// PWM slice configuration for the servo signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    /// Counter tick rate after the clock divider.
    pub tick_hz: u32,
    /// Length of one servo frame.
    pub period_us: u32,
    pub mode: CountMode,
    pub polarity: Polarity,
}

impl PwmConfig {
    /// Integer divider that turns `clock_hz` into `tick_hz`.
    ///
    /// Returns `None` when the division is not exact or does not fit the
    /// 8-bit integer part of the slice divider.
    pub const fn divider(&self, clock_hz: u32) -> Option<u8> {
        if self.tick_hz == 0 || clock_hz % self.tick_hz != 0 {
            return None;
        }
        let div = clock_hz / self.tick_hz;
        if div == 0 || div > u8::MAX as u32 {
            None
        } else {
            Some(div as u8)
        }
    }

    /// Converts a duration in microseconds into counter steps.
    pub const fn ticks(&self, micros: u32) -> u32 {
        let ticks = (micros as u64 * self.tick_hz as u64 / 1_000_000) as u32;
        ticks / self.mode.steps_per_count()
    }

    /// TOP register value giving one `period_us` frame.
    pub const fn top(&self) -> u16 {
        (self.ticks(self.period_us) - 1) as u16
    }
}

/// 1 MHz counter, 20 ms frame: one compare step is one microsecond.
pub const SERVO_PWM: PwmConfig = PwmConfig {
    tick_hz: 1_000_000,
    period_us: 20_000,
    mode: CountMode::Sawtooth,
    polarity: Polarity::NonInverted,
};

// --- Servo travel ---

/// Compare values bounding the servo's safe travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct ServoTravel {
    pub low: u16,
    pub center: u16,
    pub high: u16,
}

impl ServoTravel {
    pub const fn new(low: u16, center: u16, high: u16) -> Self {
        Self { low, center, high }
    }

    /// Builds the travel limits from pulse widths on the given PWM slice.
    pub const fn from_pulse_widths(pwm: &PwmConfig, low_us: u32, center_us: u32, high_us: u32) -> Self {
        Self::new(
            pwm.ticks(low_us) as u16,
            pwm.ticks(center_us) as u16,
            pwm.ticks(high_us) as u16,
        )
    }

    pub const fn range(&self) -> u16 {
        self.high - self.low
    }

    pub const fn is_valid(&self) -> bool {
        self.low < self.center && self.center < self.high
    }

    pub const fn contains(&self, compare: u16) -> bool {
        compare >= self.low && compare <= self.high
    }

    /// Maps an 8-bit potentiometer sample linearly onto `[low, high]`.
    ///
    /// The fraction is rounded down, so 0 lands on `low` and 255 on `high`
    /// exactly and no sample can overshoot the upper limit.
    pub const fn scale(&self, sample: u8) -> u16 {
        let offset = sample as u32 * self.range() as u32 / u8::MAX as u32;
        self.low + offset as u16
    }
}

/// 1.0 ms / 1.5 ms / 2.0 ms pulses.
pub const SERVO_TRAVEL: ServoTravel = ServoTravel::from_pulse_widths(&SERVO_PWM, 1_000, 1_500, 2_000);

// --- ADC ---

/// Analog inputs of the RP2350A package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum AdcInput {
    Ain0,
    Ain1,
    Ain2,
    Ain3,
}

impl AdcInput {
    /// Value of the `AINSEL` field.
    pub const fn channel(self) -> u8 {
        match self {
            AdcInput::Ain0 => 0,
            AdcInput::Ain1 => 1,
            AdcInput::Ain2 => 2,
            AdcInput::Ain3 => 3,
        }
    }

    pub const fn gpio(self) -> u8 {
        26 + self.channel()
    }
}

/// Width of the values pushed into the ADC FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum SampleWidth {
    Full12Bit,
    /// Result shifted right by four: the 8 most significant bits as one byte.
    Upper8Bit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Trigger {
    SingleShot,
    /// Start conversions back to back (or at the divider interval) forever.
    FreeRunning,
}

/// ADC configuration for the potentiometer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcConfig {
    pub input: AdcInput,
    pub width: SampleWidth,
    pub trigger: Trigger,
    pub conversion_rate_hz: u32,
    /// FIFO level that raises the interrupt.
    pub fifo_threshold: u8,
}

impl AdcConfig {
    /// ADC clock cycles taken by one conversion.
    pub const CONVERSION_CYCLES: u32 = 96;

    /// `(INT, FRAC)` of the ADC `DIV` register.
    ///
    /// Conversions start every `1 + INT + FRAC/256` ADC clock cycles.
    pub const fn clock_divider(&self, adc_clock_hz: u32) -> (u16, u8) {
        let interval_x256 = adc_clock_hz as u64 * 256 / self.conversion_rate_hz as u64;
        let div_x256 = interval_x256 - 256;
        ((div_x256 >> 8) as u16, (div_x256 & 0xff) as u8)
    }

    /// Whole ADC clock cycles between two conversion starts.
    pub const fn interval_cycles(&self, adc_clock_hz: u32) -> u32 {
        adc_clock_hz / self.conversion_rate_hz
    }
}

/// Free-running 8-bit conversions at roughly the rate of a 62.5 kHz
/// successive-approximation converter (13 cycles per result).
pub const POT_ADC: AdcConfig = AdcConfig {
    input: AdcInput::Ain0,
    width: SampleWidth::Upper8Bit,
    trigger: Trigger::FreeRunning,
    conversion_rate_hz: 4_800,
    fifo_threshold: 1,
};

// --- GPIO ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum PwmChannel {
    A,
    B,
}

/// Board wiring (Raspberry Pi Pico 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMap {
    pub servo_output: u8,
    /// Input with pull-up: open reads high, which selects center.
    pub mode_switch: u8,
    pub potentiometer: AdcInput,
}

impl PinMap {
    /// PWM slice driving the servo pin (bank 0, GPIO0..=GPIO15).
    pub const fn servo_slice(&self) -> u8 {
        self.servo_output / 2
    }

    pub const fn servo_channel(&self) -> PwmChannel {
        if self.servo_output % 2 == 0 { PwmChannel::A } else { PwmChannel::B }
    }
}

pub const PINS: PinMap = PinMap {
    servo_output: 0,
    mode_switch: 1,
    potentiometer: AdcInput::Ain0,
};

// --- Build-time checks ---

const _: () = assert!(matches!(SERVO_PWM.divider(SYS_CLOCK_HZ), Some(_)));
const _: () = assert!(SERVO_PWM.ticks(SERVO_PWM.period_us) <= u16::MAX as u32 + 1);
const _: () = assert!(SERVO_TRAVEL.is_valid());
const _: () = assert!(SERVO_TRAVEL.high <= SERVO_PWM.top());
const _: () = assert!(POT_ADC.interval_cycles(ADC_CLOCK_HZ) >= AdcConfig::CONVERSION_CYCLES);
const _: () = assert!(POT_ADC.interval_cycles(ADC_CLOCK_HZ) <= u16::MAX as u32 + 1);
const _: () = assert!(matches!(POT_ADC.width, SampleWidth::Upper8Bit));
const _: () = assert!(matches!(POT_ADC.trigger, Trigger::FreeRunning));
const _: () = assert!(POT_ADC.fifo_threshold >= 1);
const _: () = assert!(PINS.servo_output < 16 && PINS.mode_switch < 16);
const _: () = assert!(PINS.servo_output != PINS.mode_switch);
const _: () = assert!(PINS.potentiometer.channel() == POT_ADC.input.channel());

#[cfg(test)]
mod tests {
    use super::*;

    /// Constants of the classic 8 MHz tester: Fclk/64, TOP 2499.
    const CLASSIC: ServoTravel = ServoTravel::new(123, 184, 246);

    #[test]
    fn servo_frame_is_twenty_milliseconds() {
        assert_eq!(SERVO_PWM.divider(SYS_CLOCK_HZ), Some(150));
        assert_eq!(SERVO_PWM.top(), 19_999);
    }

    #[test]
    fn travel_is_one_to_two_milliseconds() {
        assert_eq!(SERVO_TRAVEL, ServoTravel::new(1_000, 1_500, 2_000));
        assert_eq!(SERVO_TRAVEL.range(), 1_000);
    }

    #[test]
    fn divider_rejects_inexact_or_oversized_ratios() {
        let pwm = PwmConfig { tick_hz: 125_000, ..SERVO_PWM };
        assert_eq!(pwm.divider(SYS_CLOCK_HZ), None);
        assert_eq!(pwm.divider(8_000_000), Some(64));
        assert_eq!(SERVO_PWM.divider(500_000), None);
    }

    #[test]
    fn phase_correct_halves_the_counter() {
        let pwm = PwmConfig { mode: CountMode::PhaseCorrect, ..SERVO_PWM };
        assert_eq!(pwm.top(), 9_999);
        assert_eq!(ServoTravel::from_pulse_widths(&pwm, 1_000, 1_500, 2_000), ServoTravel::new(500, 750, 1_000));
    }

    #[test]
    fn scale_hits_both_ends_exactly() {
        assert_eq!(SERVO_TRAVEL.scale(0), SERVO_TRAVEL.low);
        assert_eq!(SERVO_TRAVEL.scale(255), SERVO_TRAVEL.high);
        assert_eq!(SERVO_TRAVEL.scale(128), 1_501);

        assert_eq!(CLASSIC.scale(0), 123);
        assert_eq!(CLASSIC.scale(255), 246);
        assert_eq!(CLASSIC.scale(128), 184);
    }

    #[test]
    fn scale_stays_in_range_and_is_monotonic() {
        for travel in [SERVO_TRAVEL, CLASSIC] {
            let mut previous = travel.low;
            for sample in 0..=u8::MAX {
                let compare = travel.scale(sample);
                assert!(travel.contains(compare), "sample {sample} -> {compare}");
                assert!(compare >= previous);
                previous = compare;
            }
        }
    }

    #[test]
    fn adc_divider_matches_conversion_rate() {
        assert_eq!(POT_ADC.clock_divider(ADC_CLOCK_HZ), (9_999, 0));

        let odd = AdcConfig { conversion_rate_hz: 7_000, ..POT_ADC };
        let (int, frac) = odd.clock_divider(ADC_CLOCK_HZ);
        // 48 MHz / 7 kHz = 6857.14 cycles
        assert_eq!(int, 6_856);
        assert_eq!(frac, 36);
    }

    #[test]
    fn pin_map_selects_slice_and_channel() {
        assert_eq!(PINS.servo_slice(), 0);
        assert_eq!(PINS.servo_channel(), PwmChannel::A);
        assert_eq!(PINS.potentiometer.gpio(), 26);

        let odd = PinMap { servo_output: 7, ..PINS };
        assert_eq!(odd.servo_slice(), 3);
        assert_eq!(odd.servo_channel(), PwmChannel::B);
    }
}
