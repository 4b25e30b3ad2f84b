// SPDX-License-Identifier: MIT

use crate::config::{Channel, Gain, SessionConfig};
use crate::constants::{
    ACK_TYPES, CAPTURE_ARM_BYTE, CAPTURE_MODE_BITS, CMD_CAPTURE, CMD_SET_PARAM, CMD_TRIM_READ,
    DATA_TYPES, HID_REPORT_LEN, MARKER_ACK_STOP, PARAM_GAIN_MODE, PARAM_INT_TIME,
    PARAM_SELECT_CHANNEL, PARAM_TRIM_BLOCK, PAYLOAD_LEN, REPORT_ID, TRIM_VALUES_PER_CHANNEL,
};
use crate::frame::FrameKind;
use std::fmt;

/// Payload offset of the command code.
const OFF_COMMAND: usize = 0;
/// Payload offset of the response command code.
const OFF_RESPONSE_COMMAND: usize = 2;
/// Payload offset of the channel/type byte.
const OFF_TYPE: usize = 4;
/// Payload offset of the marker byte; arguments and pixel data follow.
const OFF_MARKER: usize = 5;
/// Payload offset of the first pixel byte on data responses.
const OFF_PIXELS: usize = 6;

/// One outgoing 65-byte HID report: report id plus fixed-layout payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandReport {
    buf: [u8; HID_REPORT_LEN],
}

impl CommandReport {
    /// Places the command code, type byte and arguments at their fixed
    /// payload offsets. Argument values are taken as-is; range checks
    /// belong to the session, not the codec.
    pub fn new(command: u8, type_byte: u8, args: &[u8]) -> Self {
        debug_assert!(OFF_MARKER + args.len() <= PAYLOAD_LEN);
        let mut buf = [0u8; HID_REPORT_LEN];
        buf[0] = REPORT_ID;
        buf[1 + OFF_COMMAND] = command;
        buf[1 + OFF_TYPE] = type_byte;
        buf[1 + OFF_MARKER..1 + OFF_MARKER + args.len()].copy_from_slice(args);
        Self { buf }
    }

    /// Capture request carrying everything a transfer cycle needs: the
    /// channel packed into the type nibble, the gain flag and the
    /// integration time in milliseconds as a little-endian f32.
    pub fn capture(config: &SessionConfig) -> Self {
        let type_byte = (config.channel().index() << 4) | CAPTURE_MODE_BITS;
        let mut args = [0u8; 6];
        args[0] = CAPTURE_ARM_BYTE;
        args[1] = config.gain().flag();
        args[2..6].copy_from_slice(&(config.integration_ms() as f32).to_le_bytes());
        Self::new(CMD_CAPTURE, type_byte, &args)
    }

    pub fn select_channel(channel: Channel) -> Self {
        Self::new(CMD_SET_PARAM, PARAM_SELECT_CHANNEL, &[channel.index(), 0x00])
    }

    pub fn gain_mode(gain: Gain) -> Self {
        Self::new(CMD_SET_PARAM, PARAM_GAIN_MODE, &[gain.flag()])
    }

    /// Requests the factory trim block of one channel.
    pub fn trim_read(channel: Channel) -> Self {
        Self::new(CMD_TRIM_READ, PARAM_TRIM_BLOCK, &[channel.index()])
    }

    pub fn integration_time(milliseconds: u32) -> Self {
        Self::new(
            CMD_SET_PARAM,
            PARAM_INT_TIME,
            &(milliseconds as f32).to_le_bytes(),
        )
    }

    pub fn command(&self) -> u8 {
        self.buf[1 + OFF_COMMAND]
    }

    pub fn type_byte(&self) -> u8 {
        self.buf[1 + OFF_TYPE]
    }

    pub fn args(&self) -> &[u8] {
        &self.buf[1 + OFF_MARKER..]
    }

    pub fn as_bytes(&self) -> &[u8; HID_REPORT_LEN] {
        &self.buf
    }
}

impl fmt::Display for CommandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandReport {{ command: {:#04x}, type: {:#04x} }}",
            self.command(),
            self.type_byte()
        )
    }
}

/// Classification of a decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// One row of pixel data for the given channel and frame geometry.
    PixelRow { channel: Channel, kind: FrameKind },
    /// Parameter acknowledgement; `done` once the stop marker arrives.
    Ack { done: bool },
    /// One block of trim values; `done` once the stop marker arrives.
    TrimBlock { done: bool },
    /// Anything the protocol does not recognize. Never an error: the
    /// session decides what to do with it.
    Unrecognized,
}

/// One incoming 65-byte HID report, decoded into named fields.
#[derive(Debug, Clone, Copy)]
pub struct Response {
    payload: [u8; PAYLOAD_LEN],
}

impl Response {
    /// Decoding a well-sized buffer always succeeds; malformed content
    /// surfaces through [`ResponseKind::Unrecognized`] instead.
    pub fn decode(report: &[u8; HID_REPORT_LEN]) -> Self {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&report[1..]);
        Self { payload }
    }

    /// Echo of the command code this response answers.
    pub fn echoed_command(&self) -> u8 {
        self.payload[OFF_COMMAND]
    }

    pub fn command(&self) -> u8 {
        self.payload[OFF_RESPONSE_COMMAND]
    }

    pub fn response_type(&self) -> u8 {
        self.payload[OFF_TYPE]
    }

    pub fn marker(&self) -> u8 {
        self.payload[OFF_MARKER]
    }

    pub fn raw_payload(&self) -> &[u8] {
        &self.payload[OFF_MARKER..]
    }

    pub fn kind(&self) -> ResponseKind {
        if self.command() == CMD_CAPTURE && DATA_TYPES.contains(&self.response_type()) {
            if let (Ok(channel), Some(kind)) = (
                Channel::from_type_byte(self.response_type()),
                FrameKind::from_type_byte(self.response_type()),
            ) {
                return ResponseKind::PixelRow { channel, kind };
            }
        }
        if self.command() == CMD_TRIM_READ && self.response_type() == PARAM_TRIM_BLOCK {
            return ResponseKind::TrimBlock {
                done: self.marker() == MARKER_ACK_STOP,
            };
        }
        if ACK_TYPES.contains(&self.response_type()) {
            return ResponseKind::Ack {
                done: self.marker() == MARKER_ACK_STOP,
            };
        }
        ResponseKind::Unrecognized
    }

    /// Trim values carried on a trim block response, starting right
    /// after the marker byte.
    pub fn trim_values(&self) -> &[u8] {
        &self.payload[OFF_PIXELS..OFF_PIXELS + TRIM_VALUES_PER_CHANNEL]
    }

    /// Extracts one row of `side` pixels, little-endian u16 pairs
    /// starting right after the marker byte.
    pub fn pixel_row(&self, side: usize) -> Vec<i32> {
        (0..side)
            .map(|i| {
                let lo = self.payload[OFF_PIXELS + 2 * i];
                let hi = self.payload[OFF_PIXELS + 2 * i + 1];
                u16::from_le_bytes([lo, hi]) as i32
            })
            .collect()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response {{ command: {:#04x}, type: {:#04x}, marker: {:#04x} }}",
            self.command(),
            self.response_type(),
            self.marker()
        )
    }
}
