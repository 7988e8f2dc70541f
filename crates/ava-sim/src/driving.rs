//! ---
//! ava_section: "11-simulation"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Clamped random-walk driving model for bundle telemetry."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use ava_wire::Reading;
use rand::Rng;

pub const THROTTLE_MAX: i64 = 1023;
pub const BRAKE_MAX: i64 = 1023;
pub const TORQUE_MAX: i64 = 2000;
/// Maximum deviation of the second throttle sensor from the first.
pub const THROTTLE_JITTER: i64 = 10;

/// What the simulated driver does during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivingAction {
    Accelerate,
    Coast,
    Brake,
}

impl DrivingAction {
    pub const ALL: [DrivingAction; 3] = [
        DrivingAction::Accelerate,
        DrivingAction::Coast,
        DrivingAction::Brake,
    ];

    /// Pick an action uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrivingAction::Accelerate => "accelerate",
            DrivingAction::Coast => "coast",
            DrivingAction::Brake => "brake",
        }
    }
}

/// Running pedal and motor values of the driving model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrivingState {
    pub throttle_1: i64,
    pub throttle_2: i64,
    pub brake: i64,
    pub torque: i64,
}

impl DrivingState {
    /// Apply one action's random deltas and clamp every channel to its range.
    pub fn step<R: Rng + ?Sized>(self, action: DrivingAction, rng: &mut R) -> Self {
        let (throttle_delta, brake_delta, torque_delta) = match action {
            DrivingAction::Accelerate => (
                rng.gen_range(10..=50i64),
                -rng.gen_range(0..=20i64),
                rng.gen_range(50..=200i64),
            ),
            DrivingAction::Brake => (
                -rng.gen_range(20..=100i64),
                rng.gen_range(50..=200i64),
                -rng.gen_range(100..=300i64),
            ),
            DrivingAction::Coast => (
                -rng.gen_range(0..=20i64),
                -rng.gen_range(0..=10i64),
                -rng.gen_range(0..=50i64),
            ),
        };

        let throttle_1 = (self.throttle_1 + throttle_delta).clamp(0, THROTTLE_MAX);
        let jitter = rng.gen_range(-THROTTLE_JITTER..=THROTTLE_JITTER);
        Self {
            throttle_1,
            throttle_2: (throttle_1 + jitter).clamp(0, THROTTLE_MAX),
            brake: (self.brake + brake_delta).clamp(0, BRAKE_MAX),
            torque: (self.torque + torque_delta).clamp(0, TORQUE_MAX),
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        (0..=THROTTLE_MAX).contains(&self.throttle_1)
            && (0..=THROTTLE_MAX).contains(&self.throttle_2)
            && (0..=BRAKE_MAX).contains(&self.brake)
            && (0..=TORQUE_MAX).contains(&self.torque)
    }

    /// Values in bundle order: throttle 1, throttle 2, brake, torque.
    pub fn values(&self) -> [i64; 4] {
        [self.throttle_1, self.throttle_2, self.brake, self.torque]
    }

    /// Pair the values with the sensor ids they are reported under.
    pub fn reading(&self, sensor_ids: [u32; 4]) -> Reading {
        Reading::from_pairs(sensor_ids.into_iter().zip(self.values()))
    }
}
