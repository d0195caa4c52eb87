//! Center/Manual mode switch

use embedded_hal::digital::InputPin;

/// Position of the mode switch.
///
/// The input is pulled up, so an open or disconnected switch reads `Center`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum SwitchPosition {
    /// Servo parked at the center pulse width.
    Center,
    /// Servo follows the potentiometer.
    Manual,
}

impl SwitchPosition {
    pub const fn from_level(high: bool) -> Self {
        if high { SwitchPosition::Center } else { SwitchPosition::Manual }
    }

    /// Samples the switch pin.
    pub fn read<P: InputPin>(pin: &mut P) -> Result<Self, P::Error> {
        pin.is_high().map(Self::from_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct Level(bool);

    impl ErrorType for Level {
        type Error = Infallible;
    }

    impl InputPin for Level {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    #[test]
    fn pulled_up_open_switch_reads_center() {
        assert_eq!(SwitchPosition::read(&mut Level(true)), Ok(SwitchPosition::Center));
    }

    #[test]
    fn grounded_switch_reads_manual() {
        assert_eq!(SwitchPosition::read(&mut Level(false)), Ok(SwitchPosition::Manual));
    }
}
