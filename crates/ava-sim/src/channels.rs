//! ---
//! ava_section: "11-simulation"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Per-channel payload shapes for binary packet telemetry."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use ava_wire::{MAX_CHANNEL_ID, PAYLOAD_CAPACITY};
use rand::{Rng, RngCore};

type Payload = [u8; PAYLOAD_CAPACITY];

/// Payload shape for one channel id.
#[derive(Clone, Copy)]
pub struct ChannelSpec {
    pub id: u8,
    pub name: &'static str,
    /// Meaningful payload bytes; everything after is zero.
    pub length: u8,
    fill: fn(&mut dyn RngCore) -> Payload,
}

impl ChannelSpec {
    /// Draw a fresh payload for this channel.
    pub fn sample(&self, rng: &mut dyn RngCore) -> ChannelSample {
        let mut payload = (self.fill)(rng);
        payload[usize::from(self.length)..].fill(0);
        ChannelSample {
            id: self.id,
            length: self.length,
            payload,
        }
    }
}

impl std::fmt::Debug for ChannelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// One channel's payload, ready to be stamped into a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSample {
    pub id: u8,
    pub length: u8,
    pub payload: Payload,
}

impl ChannelSample {
    /// Build a sample whose length is the array length. Arrays longer than
    /// the payload capacity fail to compile.
    pub fn from_array<const N: usize>(id: u8, bytes: [u8; N]) -> Self {
        const { assert!(N <= PAYLOAD_CAPACITY, "payload exceeds packet capacity") };
        Self {
            id,
            length: N as u8,
            payload: pack(&bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.payload[..usize::from(self.length)]
    }
}

fn pack(bytes: &[u8]) -> Payload {
    let mut out = [0u8; PAYLOAD_CAPACITY];
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

fn u16_le(value: u16) -> Payload {
    pack(&value.to_le_bytes())
}

fn u16_le_quad(rng: &mut dyn RngCore, max: u16) -> Payload {
    let mut out = [0u8; PAYLOAD_CAPACITY];
    for chunk in out.chunks_exact_mut(2) {
        let speed: u16 = rng.gen_range(0..=max);
        chunk.copy_from_slice(&speed.to_le_bytes());
    }
    out
}

fn ecu_status(rng: &mut dyn RngCore) -> Payload {
    pack(&[rng.gen_range(0..=3u8)])
}

fn throttle(rng: &mut dyn RngCore) -> Payload {
    u16_le(rng.gen_range(0..=1023))
}

fn brake_pressure(rng: &mut dyn RngCore) -> Payload {
    u16_le(rng.gen_range(0..=1023))
}

fn steering_angle(rng: &mut dyn RngCore) -> Payload {
    let angle: i16 = rng.gen_range(-900..=900);
    pack(&angle.to_le_bytes())
}

fn motor_rpm(rng: &mut dyn RngCore) -> Payload {
    u16_le(rng.gen_range(0..=6000))
}

fn motor_torque(rng: &mut dyn RngCore) -> Payload {
    u16_le(rng.gen_range(0..=2000))
}

fn battery_soc(rng: &mut dyn RngCore) -> Payload {
    pack(&[rng.gen_range(0..=100u8)])
}

fn cell_temperatures(rng: &mut dyn RngCore) -> Payload {
    let mut temps = [0u8; 4];
    for temp in &mut temps {
        *temp = rng.gen_range(15..=65);
    }
    pack(&temps)
}

// Seven opaque fix bytes; the last payload byte stays zero.
fn gps_fix(rng: &mut dyn RngCore) -> Payload {
    let mut fix = [0u8; 7];
    rng.fill_bytes(&mut fix);
    pack(&fix)
}

fn wheel_speeds(rng: &mut dyn RngCore) -> Payload {
    u16_le_quad(rng, 2500)
}

/// Every supported channel, indexed by id.
#[rustfmt::skip]
pub static CHANNEL_TABLE: [ChannelSpec; MAX_CHANNEL_ID as usize + 1] = [
    ChannelSpec { id: 0, name: "ecu_status", length: 1, fill: ecu_status },
    ChannelSpec { id: 1, name: "throttle_1", length: 2, fill: throttle },
    ChannelSpec { id: 2, name: "throttle_2", length: 2, fill: throttle },
    ChannelSpec { id: 3, name: "brake_pressure", length: 2, fill: brake_pressure },
    ChannelSpec { id: 4, name: "steering_angle", length: 2, fill: steering_angle },
    ChannelSpec { id: 5, name: "motor_rpm", length: 2, fill: motor_rpm },
    ChannelSpec { id: 6, name: "motor_torque", length: 2, fill: motor_torque },
    ChannelSpec { id: 7, name: "battery_soc", length: 1, fill: battery_soc },
    ChannelSpec { id: 8, name: "cell_temperatures", length: 4, fill: cell_temperatures },
    ChannelSpec { id: 9, name: "gps_fix", length: 8, fill: gps_fix },
    ChannelSpec { id: 10, name: "wheel_speeds", length: 8, fill: wheel_speeds },
];

/// Look up a channel's shape.
pub fn channel(id: u8) -> Option<&'static ChannelSpec> {
    CHANNEL_TABLE.get(usize::from(id))
}

/// Round-robin channel selector cycling `0..=10`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelRotor {
    current: u8,
}

impl ChannelRotor {
    /// Start at an arbitrary channel; ids beyond the table wrap.
    pub fn starting_at(id: u8) -> Self {
        Self {
            current: id % (MAX_CHANNEL_ID + 1),
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn spec(&self) -> &'static ChannelSpec {
        &CHANNEL_TABLE[usize::from(self.current)]
    }

    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            current: if self.current >= MAX_CHANNEL_ID {
                0
            } else {
                self.current + 1
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn table_is_indexed_by_id() {
        for (index, spec) in CHANNEL_TABLE.iter().enumerate() {
            assert_eq!(usize::from(spec.id), index, "{} out of place", spec.name);
            assert!(usize::from(spec.length) <= PAYLOAD_CAPACITY);
        }
        assert!(channel(MAX_CHANNEL_ID).is_some());
        assert!(channel(MAX_CHANNEL_ID + 1).is_none());
    }

    #[test]
    fn every_channel_zero_fills_beyond_length() {
        let mut rng = StdRng::seed_from_u64(99);
        for spec in &CHANNEL_TABLE {
            for _ in 0..64 {
                let sample = spec.sample(&mut rng);
                assert_eq!(sample.id, spec.id);
                assert_eq!(sample.bytes().len(), usize::from(spec.length));
                assert!(
                    sample.payload[usize::from(sample.length)..].iter().all(|b| *b == 0),
                    "{} leaked bytes past its length",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn gps_fix_has_seven_bytes_and_zero_tail() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = channel(9).unwrap();
        for _ in 0..64 {
            let sample = spec.sample(&mut rng);
            assert_eq!(sample.length, 8);
            assert_eq!(sample.payload[7], 0);
        }
    }

    #[test]
    fn battery_soc_is_a_percentage() {
        let mut rng = StdRng::seed_from_u64(2);
        let spec = channel(7).unwrap();
        for _ in 0..256 {
            let sample = spec.sample(&mut rng);
            assert_eq!(sample.length, 1);
            assert!(sample.payload[0] <= 100);
        }
    }

    #[test]
    fn ranged_u16_channels_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for (id, max) in [(1u8, 1023u16), (2, 1023), (3, 1023), (5, 6000), (6, 2000)] {
            let spec = channel(id).unwrap();
            for _ in 0..128 {
                let sample = spec.sample(&mut rng);
                let value = u16::from_le_bytes([sample.payload[0], sample.payload[1]]);
                assert!(value <= max, "{} produced {value}", spec.name);
            }
        }
    }

    #[test]
    fn steering_is_signed_tenths_of_a_degree() {
        let mut rng = StdRng::seed_from_u64(6);
        let spec = channel(4).unwrap();
        for _ in 0..128 {
            let sample = spec.sample(&mut rng);
            let angle = i16::from_le_bytes([sample.payload[0], sample.payload[1]]);
            assert!((-900..=900).contains(&angle));
        }
    }

    #[test]
    fn rotor_cycles_and_wraps_after_ten() {
        let mut rotor = ChannelRotor::default();
        let mut visited = Vec::new();
        for _ in 0..12 {
            visited.push(rotor.current());
            rotor = rotor.advance();
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0]);
        assert_eq!(ChannelRotor::starting_at(12).current(), 1);
    }

    #[test]
    fn from_array_declares_exactly_the_bytes_given() {
        let short = ChannelSample::from_array(5, 1001u16.to_le_bytes());
        assert_eq!(short.length, 2);
        assert_eq!(short.bytes(), &[0xE9, 0x03]);
        assert!(short.payload[2..].iter().all(|&b| b == 0));

        let full = ChannelSample::from_array(3, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(full.length, 8);
        assert_eq!(full.bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
