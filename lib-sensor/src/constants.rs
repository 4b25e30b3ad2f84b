// SPDX-License-Identifier: MIT

/// Vendor ID of the sensor head.
pub const VENDOR_ID: u16 = 0x0483;

/// Product ID of the sensor head.
pub const PRODUCT_ID: u16 = 0x5750;

/// Full HID report length: one report-id byte plus 64 payload bytes.
pub const HID_REPORT_LEN: usize = 65;

/// Payload length of a single report.
pub const PAYLOAD_LEN: usize = HID_REPORT_LEN - 1;

/// Report id used for all traffic in both directions.
pub const REPORT_ID: u8 = 0;

/// Command code for parameter writes (channel, gain, integration time).
pub const CMD_SET_PARAM: u8 = 0x01;

/// Command code for frame capture; also echoed on pixel data responses.
pub const CMD_CAPTURE: u8 = 0x02;

/// Command code for reading the factory trim block.
pub const CMD_TRIM_READ: u8 = 0x04;

/// Parameter type for the gain mode flag.
pub const PARAM_GAIN_MODE: u8 = 0x07;

/// Parameter type for the integration time (f32 little-endian, milliseconds).
pub const PARAM_INT_TIME: u8 = 0x20;

/// Parameter type for channel selection (zero-based on the wire).
pub const PARAM_SELECT_CHANNEL: u8 = 0x26;

/// Type byte of a trim block request and its responses.
pub const PARAM_TRIM_BLOCK: u8 = 0x2D;

/// Number of trim values carried per channel.
pub const TRIM_VALUES_PER_CHANNEL: usize = 24;

/// Mode bits carried in the low nibble of the capture type byte.
pub const CAPTURE_MODE_BITS: u8 = 0x02;

/// Leading argument byte of a capture command.
pub const CAPTURE_ARM_BYTE: u8 = 0xFF;

/// Marker on a data response: more rows pending.
pub const MARKER_MORE_DATA: u8 = 0x0B;

/// Marker on a data response: sequence complete, no further writes.
pub const MARKER_COMPLETE: u8 = 0xF1;

/// Marker on a non-data response: acknowledge and stop.
pub const MARKER_ACK_STOP: u8 = 0x17;

/// Response type bytes that carry pixel data.
pub const DATA_TYPES: [u8; 6] = [0x01, 0x02, 0x12, 0x22, 0x32, 0x03];

/// Response type bytes that carry a parameter acknowledgement.
pub const ACK_TYPES: [u8; 3] = [0x07, 0x08, 0x0B];

/// Default read timeout. Sized for the longest integration time the
/// sensor supports plus readout, per the vendor protocol.
pub const DEFAULT_READ_TIMEOUT_MS: i32 = 264_000;

/// Upper bound on write/read cycles within one capture. A well-behaved
/// device terminates a 24-row transfer well below this.
pub const MAX_TRANSFER_CYCLES: usize = 64;

/// Lowest accepted integration time in milliseconds.
pub const MIN_INTEGRATION_MS: u32 = 1;

/// Highest accepted integration time in milliseconds.
pub const MAX_INTEGRATION_MS: u32 = 66_000;

/// Number of selectable sensor channels.
pub const CHANNEL_COUNT: u8 = 4;
