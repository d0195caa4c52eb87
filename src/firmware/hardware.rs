//! Hardware Abstraction Module
//!
//! This module handles the low-level configuration of the RP2350 peripherals.
//! It sets up the clocks, the servo PWM slice, the free-running ADC and the
//! mode switch, and hands the pieces the control loop needs back to `main`.

use defmt::*;
use embedded_hal::pwm::SetDutyCycle;

use rp235x_hal as hal;
use hal::Clock;
use hal::pac;

use servo_tester::config::{
    ADC_CLOCK_HZ, CountMode, PINS, POT_ADC, Polarity, PwmChannel, SERVO_PWM, SERVO_TRAVEL,
    SYS_CLOCK_HZ, SampleWidth, Trigger,
};

/// External crystal frequency used by the Raspberry Pi Pico 2.
const XTAL_FREQ_HZ: u32 = 12_000_000u32;

// Typed pins below must match the board wiring in `config::PINS`
const _: () = assert!(PINS.servo_output == 0);
const _: () = assert!(PINS.servo_slice() == 0 && matches!(PINS.servo_channel(), PwmChannel::A));
const _: () = assert!(PINS.mode_switch == 1);
const _: () = assert!(PINS.potentiometer.gpio() == 26);

pub type ModeSwitchPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio1, hal::gpio::FunctionSioInput, hal::gpio::PullUp>;

pub type ServoPwm =
    hal::pwm::Channel<hal::pwm::Slice<hal::pwm::Pwm0, hal::pwm::FreeRunning>, hal::pwm::A>;

pub type PotentiometerPin = hal::adc::AdcPin<
    hal::gpio::Pin<hal::gpio::bank0::Gpio26, hal::gpio::FunctionNull, hal::gpio::PullNone>,
>;

/// Peripherals handed over to the application.
pub struct Hardware {
    pub timer: hal::Timer<hal::timer::CopyableTimer0>,
    pub mode_switch: ModeSwitchPin,
    pub servo: ServoPwm,
    /// Held for the life of the program so the pad stays in analog mode.
    pub potentiometer: PotentiometerPin,
}

/// Initializes the entire hardware stack.
///
/// This function:
/// 1.  Takes ownership of the raw PAC peripherals.
/// 2.  Configures the Clocks (150 MHz system, 48 MHz ADC) and checks them
///     against the configuration the PWM and ADC timing was derived from.
/// 3.  Initializes the Microsecond Timer (used for the settling delay).
/// 4.  Configures GPIO pins (switch with pull-up, analog pad).
/// 5.  Starts the servo PWM with a center pulse.
/// 6.  Sets up the ADC for interrupt-driven free-running mode.
///
/// Interrupts stay globally disabled; the caller enables them.
pub fn init() -> Hardware {
    // 1. Take ownership of raw peripherals
    let mut pac = unwrap!(pac::Peripherals::take());
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // 2. Configure Clocks
    let clocks = unwrap!(
        hal::clocks::init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
    );

    let sys_hz = clocks.system_clock.freq().to_Hz();
    assert_eq!(sys_hz, SYS_CLOCK_HZ);
    assert_eq!(clocks.adc_clock.freq().to_Hz(), ADC_CLOCK_HZ);

    // 3. Configure Timer (Microsecond precision)
    let timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    // 4. Configure GPIOs
    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Open switch reads high, which means center
    let mode_switch = pins.gpio1.into_pull_up_input();

    let potentiometer = unwrap!(
        hal::adc::AdcPin::new(pins.gpio26.into_pull_type::<hal::gpio::PullNone>()).ok()
    );

    // 5. Configure PWM (20 ms frame, compare value in counter ticks)
    let divider = unwrap!(SERVO_PWM.divider(sys_hz));
    let top = SERVO_PWM.top();

    let pwm_slices = hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
    let mut pwm = pwm_slices.pwm0;

    pwm.disable();
    pwm.disable_interrupt();
    match SERVO_PWM.mode {
        CountMode::Sawtooth => pwm.clr_ph_correct(),
        CountMode::PhaseCorrect => pwm.set_ph_correct(),
    }
    pwm.set_div_int(divider);
    pwm.set_div_frac(0);
    pwm.set_top(top);
    pwm.set_counter(0);

    match SERVO_PWM.polarity {
        Polarity::NonInverted => pwm.channel_a.clr_inverted(),
        Polarity::Inverted => pwm.channel_a.set_inverted(),
    }
    let Ok(()) = pwm.channel_a.set_duty_cycle(SERVO_TRAVEL.center);
    pwm.channel_a.output_to(pins.gpio0);
    pwm.enable();

    let servo = pwm.channel_a;

    debug!("PWM: div {} top {} travel {}", divider, top, SERVO_TRAVEL);

    // 6. Configure ADC (Interrupt Driven)
    let _adc = hal::Adc::new(pac.ADC, &mut pac.RESETS);
    let (div_int, div_frac) = POT_ADC.clock_divider(ADC_CLOCK_HZ);

    unsafe {
        let adc_regs = &(*pac::ADC::ptr());

        // Start a conversion every 1 + INT + FRAC/256 ADC clocks
        adc_regs.div().write(|w| w.int().bits(div_int).frac().bits(div_frac));

        // FIFO Control: Enable, 8-bit results, interrupt threshold, No DMA
        adc_regs.fcs().modify(|_, w| {
            w.en().set_bit()
             .shift().bit(POT_ADC.width == SampleWidth::Upper8Bit)
             .thresh().bits(POT_ADC.fifo_threshold)
             .dreq_en().clear_bit()
        });

        // Enable FIFO Interrupt
        adc_regs.inte().modify(|_, w| w.fifo().set_bit());

        // Channel Control: potentiometer input, Enable, Free running
        adc_regs.cs().modify(|_, w| {
            w.ainsel().bits(POT_ADC.input.channel())
             .en().set_bit()
             .start_many().bit(POT_ADC.trigger == Trigger::FreeRunning)
        });

        // Unmask ADC Interrupt in NVIC
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::ADC_IRQ_FIFO);
    }

    debug!(
        "ADC: {} every {} cycles, switch GPIO{}, servo GPIO{}",
        POT_ADC.input,
        POT_ADC.interval_cycles(ADC_CLOCK_HZ),
        PINS.mode_switch,
        PINS.servo_output
    );

    // Return ready-to-use hardware
    Hardware {
        timer,
        mode_switch,
        servo,
        potentiometer,
    }
}
