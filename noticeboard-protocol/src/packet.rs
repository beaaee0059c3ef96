//! Packet framing
//!
//! - START: 0xAA
//! - LENGTH: payload length, at most [`MAX_PAYLOAD_LEN`]
//! - TYPE: message type
//! - PAYLOAD
//! - CHECKSUM: XOR of LENGTH, TYPE and every payload byte

use heapless::Vec;

pub const START_BYTE: u8 = 0xAA;

pub const MAX_PAYLOAD_LEN: usize = 250;

/// START + LENGTH + TYPE + payload + CHECKSUM
pub const MAX_PACKET_LEN: usize = MAX_PAYLOAD_LEN + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
    /// Checksum byte did not match
    InvalidChecksum,
    /// Length byte out of range
    InvalidLength,
    /// Payload ended before a field was complete
    Truncated,
    /// Field content is not valid for its type
    InvalidField,
    /// Message type not known on this link
    UnknownType(u8),
    /// Output buffer too small
    BufferTooSmall,
}

/// One framed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub kind: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Packet {
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Packet without payload
    pub fn bare(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.payload.len() + 4
    }

    fn checksum(len: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(len ^ kind, |acc, b| acc ^ b)
    }

    /// Write the packet into `out`, returning the bytes used
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let total = self.encoded_len();
        let out = out.get_mut(..total).ok_or(FrameError::BufferTooSmall)?;
        let len = self.payload.len() as u8;
        let (body, tail) = out.split_at_mut(total - 1);

        body[0] = START_BYTE;
        body[1] = len;
        body[2] = self.kind;
        body[3..].copy_from_slice(&self.payload);
        tail[0] = Self::checksum(len, self.kind, &self.payload);
        Ok(total)
    }

    pub fn to_bytes(&self) -> Vec<u8, MAX_PACKET_LEN> {
        let mut out = [0u8; MAX_PACKET_LEN];
        // Payload length is bounded by construction, so this always fits
        let len = self.encode(&mut out).unwrap_or(0);
        let mut bytes = Vec::new();
        let _ = bytes.extend_from_slice(&out[..len]);
        bytes
    }

    pub fn reader(&self) -> PayloadReader<'_> {
        PayloadReader::new(&self.payload)
    }
}

/// Builds a payload field by field
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) -> Result<&mut Self, FrameError> {
        self.bytes(&[value])
    }

    pub fn u32(&mut self, value: u32) -> Result<&mut Self, FrameError> {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i64(&mut self, value: i64) -> Result<&mut Self, FrameError> {
        self.bytes(&value.to_le_bytes())
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, FrameError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(self)
    }

    /// Length-prefixed UTF-8, cut at a character boundary to fit
    pub fn text(&mut self, text: &str) -> Result<&mut Self, FrameError> {
        let room = (MAX_PAYLOAD_LEN - self.buf.len()).saturating_sub(1).min(255);
        let cut = floor_char_boundary(text, room);
        self.u8(cut as u8)?;
        self.bytes(&text.as_bytes()[..cut])
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(&self, kind: u8) -> Packet {
        Packet {
            kind,
            payload: self.buf.clone(),
        }
    }
}

/// Reads fields back out of a payload
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FrameError> {
        if self.bytes.len() < n {
            return Err(FrameError::Truncated);
        }
        let (head, rest) = self.bytes.split_at(n);
        self.bytes = rest;
        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32, FrameError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(b))
    }

    pub fn i64(&mut self) -> Result<i64, FrameError> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8)?);
        Ok(i64::from_le_bytes(b))
    }

    pub fn text(&mut self) -> Result<&'a str, FrameError> {
        let len = usize::from(self.u8()?);
        core::str::from_utf8(self.take(len)?).map_err(|_| FrameError::InvalidField)
    }

    /// Next text field, or `""` once the payload is exhausted
    pub fn text_or_empty(&mut self) -> Result<&'a str, FrameError> {
        if self.bytes.is_empty() {
            return Ok("");
        }
        self.text()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Largest char boundary in `text` not above `max`
pub(crate) fn floor_char_boundary(text: &str, max: usize) -> usize {
    if text.len() <= max {
        return text.len();
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sync,
    Length,
    Kind,
    Body,
    Check,
}

/// Byte-at-a-time packet decoder
///
/// Bytes before a START byte are skipped, so the parser resynchronises on
/// its own after line noise or a dropped byte.
#[derive(Debug, Clone)]
pub struct PacketParser {
    phase: Phase,
    len: u8,
    kind: u8,
    body: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    pub fn new() -> Self {
        Self {
            phase: Phase::Sync,
            len: 0,
            kind: 0,
            body: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Sync;
        self.body.clear();
    }

    /// Feed one byte; a packet is returned once its checksum byte arrives
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, FrameError> {
        match self.phase {
            Phase::Sync => {
                if byte == START_BYTE {
                    self.phase = Phase::Length;
                }
            }
            Phase::Length => {
                if usize::from(byte) > MAX_PAYLOAD_LEN {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.len = byte;
                self.phase = Phase::Kind;
            }
            Phase::Kind => {
                self.kind = byte;
                self.body.clear();
                self.phase = if self.len == 0 { Phase::Check } else { Phase::Body };
            }
            Phase::Body => {
                let _ = self.body.push(byte);
                if self.body.len() == usize::from(self.len) {
                    self.phase = Phase::Check;
                }
            }
            Phase::Check => {
                let expected = Packet::checksum(self.len, self.kind, &self.body);
                let packet = Packet {
                    kind: self.kind,
                    payload: self.body.clone(),
                };
                self.reset();
                if byte != expected {
                    return Err(FrameError::InvalidChecksum);
                }
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    /// Feed a chunk, handing every outcome to `sink` in arrival order
    pub fn feed_all<F>(&mut self, bytes: &[u8], mut sink: F)
    where
        F: FnMut(Result<Packet, FrameError>),
    {
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(packet)) => sink(Ok(packet)),
                Ok(None) => {}
                Err(e) => sink(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec as StdVec;

    use super::*;

    fn parse_all(bytes: &[u8]) -> StdVec<Result<Packet, FrameError>> {
        let mut out = StdVec::new();
        PacketParser::new().feed_all(bytes, |r| out.push(r));
        out
    }

    #[test]
    fn test_bare_packet_layout() {
        let mut buf = [0u8; 8];
        assert_eq!(Packet::bare(0x20).encode(&mut buf), Ok(4));
        assert_eq!(&buf[..4], &[START_BYTE, 0, 0x20, 0x20]);
    }

    #[test]
    fn test_checksum_covers_payload() {
        let packet = Packet::new(0x21, &[0x01, 0x02]).unwrap();
        let bytes = packet.to_bytes();
        assert_eq!(bytes.as_slice(), &[START_BYTE, 2, 0x21, 0x01, 0x02, 2 ^ 0x21 ^ 0x01 ^ 0x02]);
    }

    #[test]
    fn test_parser_round_trip_and_back_to_back() {
        let a = Packet::new(0x40, b"hello").unwrap();
        let b = Packet::bare(0x41);
        let mut stream = StdVec::new();
        stream.extend_from_slice(&a.to_bytes());
        stream.extend_from_slice(&b.to_bytes());

        assert_eq!(parse_all(&stream), std::vec![Ok(a), Ok(b)]);
    }

    #[test]
    fn test_parser_skips_noise() {
        let p = Packet::bare(0x24);
        let mut stream = std::vec![0x00, 0x13, 0xFF];
        stream.extend_from_slice(&p.to_bytes());
        assert_eq!(parse_all(&stream), std::vec![Ok(p)]);
    }

    #[test]
    fn test_bad_checksum_then_recovers() {
        let p = Packet::new(0x21, &[9, 9]).unwrap();
        let mut bad = p.to_bytes();
        let last = bad.len() - 1;
        bad[last] ^= 0x55;

        let mut stream = StdVec::new();
        stream.extend_from_slice(&bad);
        stream.extend_from_slice(&p.to_bytes());
        assert_eq!(
            parse_all(&stream),
            std::vec![Err(FrameError::InvalidChecksum), Ok(p)]
        );
    }

    #[test]
    fn test_length_out_of_range() {
        assert_eq!(
            parse_all(&[START_BYTE, 251]),
            std::vec![Err(FrameError::InvalidLength)]
        );
    }

    #[test]
    fn test_payload_limit() {
        assert_eq!(
            Packet::new(1, &[0u8; MAX_PAYLOAD_LEN + 1]),
            Err(FrameError::PayloadTooLarge)
        );
        let mut small = [0u8; 3];
        assert_eq!(
            Packet::bare(1).encode(&mut small),
            Err(FrameError::BufferTooSmall)
        );
    }

    #[test]
    fn test_writer_reader_fields() {
        let mut w = PayloadWriter::new();
        w.u8(7).unwrap().u32(70_000).unwrap().i64(-5).unwrap().text("né").unwrap();
        let packet = w.finish(0x61);

        let mut r = packet.reader();
        assert_eq!(r.u8(), Ok(7));
        assert_eq!(r.u32(), Ok(70_000));
        assert_eq!(r.i64(), Ok(-5));
        assert_eq!(r.text(), Ok("né"));
        assert_eq!(r.text_or_empty(), Ok(""));
        assert_eq!(r.u8(), Err(FrameError::Truncated));
    }

    #[test]
    fn test_writer_text_cut_on_char_boundary() {
        let mut w = PayloadWriter::new();
        w.bytes(&[0u8; MAX_PAYLOAD_LEN - 4]).unwrap();
        // Three bytes of room: "aé" fits, the trailing 'é' does not
        w.text("aéé").unwrap();
        let packet = w.finish(1);
        let mut r = PayloadReader::new(&packet.payload[MAX_PAYLOAD_LEN - 4..]);
        assert_eq!(r.text(), Ok("aé"));
    }

    #[test]
    fn test_reader_rejects_bad_utf8() {
        let mut r = PayloadReader::new(&[2, 0xC3, 0x28]);
        assert_eq!(r.text(), Err(FrameError::InvalidField));
    }
}
