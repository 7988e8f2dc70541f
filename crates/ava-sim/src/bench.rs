//! ---
//! ava_section: "11-simulation"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Deterministic bench pattern for receiver bring-up."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
//! Bench pattern: throttle and brake toggle between two known values and
//! the motor RPM counts up by one per tick. Useful when checking a receiver
//! dashboard by eye, since every value is predictable.

use crate::channels::ChannelSample;

const THROTTLE_CHANNEL: u8 = 1;
const BRAKE_CHANNEL: u8 = 3;
const RPM_CHANNEL: u8 = 5;

const THROTTLE_LEVELS: (u8, u8) = (42, 43);
const BRAKE_LEVELS: (u8, u8) = (30, 35);
const RPM_START: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchPattern {
    pub throttle: u8,
    pub brake: u8,
    pub rpm: u16,
}

impl Default for BenchPattern {
    fn default() -> Self {
        Self {
            throttle: THROTTLE_LEVELS.0,
            brake: BRAKE_LEVELS.0,
            rpm: RPM_START,
        }
    }
}

fn toggle(current: u8, levels: (u8, u8)) -> u8 {
    if current == levels.0 {
        levels.1
    } else {
        levels.0
    }
}

impl BenchPattern {
    #[must_use]
    pub fn step(self) -> Self {
        Self {
            throttle: toggle(self.throttle, THROTTLE_LEVELS),
            brake: toggle(self.brake, BRAKE_LEVELS),
            rpm: self.rpm.wrapping_add(1),
        }
    }

    /// Throttle, brake and RPM samples for the current values.
    pub fn samples(&self) -> [ChannelSample; 3] {
        [
            ChannelSample::from_array(THROTTLE_CHANNEL, [self.throttle]),
            ChannelSample::from_array(BRAKE_CHANNEL, [self.brake]),
            ChannelSample::from_array(RPM_CHANNEL, self.rpm.to_le_bytes()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_flips_both_pedals() {
        let next = BenchPattern::default().step();
        assert_eq!(next.throttle, 43);
        assert_eq!(next.brake, 35);
        assert_eq!(next.rpm, 1001);

        let back = next.step();
        assert_eq!(back.throttle, 42);
        assert_eq!(back.brake, 30);
    }

    #[test]
    fn rpm_wraps_around() {
        let pattern = BenchPattern {
            rpm: u16::MAX,
            ..BenchPattern::default()
        };
        assert_eq!(pattern.step().rpm, 0);
    }

    #[test]
    fn samples_target_fixed_channels() {
        let [throttle, brake, rpm] = BenchPattern::default().samples();
        assert_eq!((throttle.id, throttle.bytes()), (1, &[42u8][..]));
        assert_eq!((brake.id, brake.bytes()), (3, &[30u8][..]));
        assert_eq!((rpm.id, rpm.bytes()), (5, &[0xE8u8, 0x03][..]));
    }
}
