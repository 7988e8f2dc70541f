//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
//! Fixed 14-byte channel packet.
//!
//! ```text
//! offset  size  field
//! 0       4     timestamp  (u32, little-endian, device ms mod 2^32)
//! 4       1     id         (channel selector, 0..=10)
//! 5       1     length     (meaningful payload bytes, 0..=8)
//! 6       8     payload    (zero beyond `length`)
//! ```

use crate::error::{WireError, WireResult};
use crate::frame::WireFrame;

pub const PACKET_SIZE: usize = 14;
pub const PAYLOAD_CAPACITY: usize = 8;
pub const MAX_CHANNEL_ID: u8 = 10;

const TIMESTAMP_OFFSET: usize = 0;
const ID_OFFSET: usize = 4;
const LENGTH_OFFSET: usize = 5;
const PAYLOAD_OFFSET: usize = 6;

/// A single-channel binary telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryPacket {
    timestamp: u32,
    id: u8,
    length: u8,
    payload: [u8; PAYLOAD_CAPACITY],
}

impl TelemetryPacket {
    /// Build a packet whose `length` is the number of bytes supplied.
    pub fn new(timestamp: u32, id: u8, bytes: &[u8]) -> WireResult<Self> {
        if id > MAX_CHANNEL_ID {
            return Err(WireError::UnknownChannel { id });
        }
        if bytes.len() > PAYLOAD_CAPACITY {
            return Err(WireError::PayloadTooLong { len: bytes.len() });
        }
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        payload[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            timestamp,
            id,
            length: bytes.len() as u8,
            payload,
        })
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// The meaningful part of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..usize::from(self.length)]
    }

    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        let mut out = [0u8; PACKET_SIZE];
        out[TIMESTAMP_OFFSET..ID_OFFSET].copy_from_slice(&self.timestamp.to_le_bytes());
        out[ID_OFFSET] = self.id;
        out[LENGTH_OFFSET] = self.length;
        let used = usize::from(self.length);
        out[PAYLOAD_OFFSET..PAYLOAD_OFFSET + used].copy_from_slice(&self.payload[..used]);
        out
    }

    /// Parse a packet, enforcing the size, `length` and zero-fill rules.
    pub fn decode(bytes: &[u8]) -> WireResult<Self> {
        if bytes.len() != PACKET_SIZE {
            return Err(WireError::PacketSize {
                actual: bytes.len(),
            });
        }
        let timestamp = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let id = bytes[ID_OFFSET];
        let length = bytes[LENGTH_OFFSET];
        if usize::from(length) > PAYLOAD_CAPACITY {
            return Err(WireError::LengthField { length });
        }
        let payload = &bytes[PAYLOAD_OFFSET..];
        if let Some(index) = payload
            .iter()
            .enumerate()
            .skip(usize::from(length))
            .find_map(|(index, byte)| (*byte != 0).then_some(index))
        {
            return Err(WireError::NonZeroPadding { index });
        }
        Self::new(timestamp, id, &payload[..usize::from(length)])
    }

    pub fn to_frame(&self) -> WireFrame {
        WireFrame::Binary(self.encode().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn layout_is_little_endian_with_zero_fill() {
        let packet = TelemetryPacket::new(0x0102_0304, 5, &[0xE8, 0x03]).unwrap();
        assert_eq!(
            packet.encode(),
            [0x04, 0x03, 0x02, 0x01, 5, 2, 0xE8, 0x03, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn full_payload_uses_all_eight_bytes() {
        let packet = TelemetryPacket::new(7, 9, &[1, 2, 3, 4, 5, 6, 7, 0]).unwrap();
        let bytes = packet.encode();
        assert_eq!(bytes[5], 8);
        assert_eq!(&bytes[6..], &[1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = TelemetryPacket::new(0, 1, &[0; 9]).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLong { len: 9 }));
    }

    #[test]
    fn rejects_unknown_channel() {
        let err = TelemetryPacket::new(0, 11, &[1]).unwrap_err();
        assert!(matches!(err, WireError::UnknownChannel { id: 11 }));
    }

    #[test]
    fn decode_rejects_wrong_size_and_dirty_padding() {
        assert!(matches!(
            TelemetryPacket::decode(&[0; 13]),
            Err(WireError::PacketSize { actual: 13 })
        ));

        let mut bytes = TelemetryPacket::new(1, 7, &[55]).unwrap().encode();
        bytes[10] = 0xAA;
        assert!(matches!(
            TelemetryPacket::decode(&bytes),
            Err(WireError::NonZeroPadding { index: 4 })
        ));

        bytes[10] = 0;
        bytes[5] = 9;
        assert!(matches!(
            TelemetryPacket::decode(&bytes),
            Err(WireError::LengthField { length: 9 })
        ));
    }

    #[test]
    fn binary_frame_carries_fourteen_bytes() {
        let frame = TelemetryPacket::new(0, 0, &[]).unwrap().to_frame();
        assert_eq!(frame.kind(), "binary");
        assert_eq!(frame.len(), PACKET_SIZE);
    }

    proptest! {
        #[test]
        fn encoded_packets_respect_length_and_zero_fill(
            timestamp in any::<u32>(),
            id in 0u8..=MAX_CHANNEL_ID,
            payload in proptest::collection::vec(any::<u8>(), 0..=PAYLOAD_CAPACITY),
        ) {
            let packet = TelemetryPacket::new(timestamp, id, &payload).unwrap();
            let bytes = packet.encode();
            prop_assert_eq!(bytes.len(), PACKET_SIZE);
            let length = usize::from(bytes[LENGTH_OFFSET]);
            prop_assert!(length <= PAYLOAD_CAPACITY);
            prop_assert_eq!(length, payload.len());
            prop_assert!(bytes[PAYLOAD_OFFSET + length..].iter().all(|b| *b == 0));
            prop_assert_eq!(TelemetryPacket::decode(&bytes).unwrap(), packet);
        }
    }
}
