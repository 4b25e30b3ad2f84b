// SPDX-License-Identifier: MIT

use uls24_hid::config::{Channel, Gain, SessionConfig};
use uls24_hid::constants::*;
use uls24_hid::frame::FrameKind;
use uls24_hid::report::{CommandReport, Response, ResponseKind};

/// Builds a response buffer the way the device lays it out: echoed
/// command at payload offset 0, response command at 2, type at 4,
/// marker at 5, little-endian u16 pixels from 6.
fn response_buf(command: u8, rtype: u8, marker: u8, pixels: &[u16]) -> [u8; HID_REPORT_LEN] {
    let mut buf = [0u8; HID_REPORT_LEN];
    buf[1] = command;
    buf[3] = command;
    buf[5] = rtype;
    buf[6] = marker;
    for (i, px) in pixels.iter().enumerate() {
        let bytes = px.to_le_bytes();
        buf[7 + 2 * i] = bytes[0];
        buf[8 + 2 * i] = bytes[1];
    }
    buf
}

#[test]
fn capture_command_layout() {
    let config = SessionConfig::new(3, Gain::High, 250).unwrap();
    let report = CommandReport::capture(&config);
    let buf = report.as_bytes();

    assert_eq!(buf[0], REPORT_ID);
    assert_eq!(buf[1], CMD_CAPTURE);
    assert_eq!(buf[5], (2 << 4) | CAPTURE_MODE_BITS);
    assert_eq!(buf[6], CAPTURE_ARM_BYTE);
    assert_eq!(buf[7], 0); // high gain flag
    assert_eq!(&buf[8..12], &250f32.to_le_bytes());
}

#[test]
fn capture_command_low_gain_flag() {
    let config = SessionConfig::new(1, Gain::Low, 30).unwrap();
    let report = CommandReport::capture(&config);

    assert_eq!(report.type_byte(), CAPTURE_MODE_BITS);
    assert_eq!(report.args()[1], 1);
}

#[test]
fn select_channel_command_layout() {
    let report = CommandReport::select_channel(Channel::new(4).unwrap());
    let buf = report.as_bytes();

    assert_eq!(buf[1], CMD_SET_PARAM);
    assert_eq!(buf[5], PARAM_SELECT_CHANNEL);
    assert_eq!(buf[6], 3); // zero-based on the wire
    assert_eq!(buf[7], 0);
}

#[test]
fn gain_mode_command_layout() {
    let report = CommandReport::gain_mode(Gain::Low);
    let buf = report.as_bytes();

    assert_eq!(buf[1], CMD_SET_PARAM);
    assert_eq!(buf[5], PARAM_GAIN_MODE);
    assert_eq!(buf[6], 1);
}

#[test]
fn integration_time_command_is_f32_le() {
    let report = CommandReport::integration_time(66_000);
    let buf = report.as_bytes();

    assert_eq!(buf[1], CMD_SET_PARAM);
    assert_eq!(buf[5], PARAM_INT_TIME);
    assert_eq!(&buf[6..10], &66_000f32.to_le_bytes());
}

#[test]
fn decode_pixel_row_channel_from_type_nibble() {
    for (rtype, expected_channel) in [(0x02u8, 1u8), (0x12, 2), (0x22, 3), (0x32, 4)] {
        let buf = response_buf(CMD_CAPTURE, rtype, 0x00, &[1; 24]);
        let response = Response::decode(&buf);

        match response.kind() {
            ResponseKind::PixelRow { channel, kind } => {
                assert_eq!(channel.number(), expected_channel);
                assert_eq!(kind, FrameKind::Dim24);
            }
            other => panic!("expected pixel row, got {other:?}"),
        }
    }
}

#[test]
fn decode_type_01_is_12x12() {
    let buf = response_buf(CMD_CAPTURE, 0x01, 0x00, &[9; 12]);
    let response = Response::decode(&buf);

    match response.kind() {
        ResponseKind::PixelRow { channel, kind } => {
            assert_eq!(channel.number(), 1);
            assert_eq!(kind, FrameKind::Dim12);
        }
        other => panic!("expected pixel row, got {other:?}"),
    }
}

#[test]
fn encode_decode_round_trip_recovers_channel() {
    for number in 1..=4u8 {
        let config = SessionConfig::new(number, Gain::Low, 30).unwrap();
        let command = CommandReport::capture(&config);

        // Fabricate a data response echoing the command's type byte.
        let buf = response_buf(CMD_CAPTURE, command.type_byte(), 0x00, &[0; 24]);
        let response = Response::decode(&buf);

        let channel = Channel::from_type_byte(response.response_type()).unwrap();
        assert_eq!(channel.number(), number);
    }
}

#[test]
fn channel_recovery_rejects_out_of_range_nibble() {
    // High nibble 4 would be channel 5; 0xF would be channel 16.
    assert!(Channel::from_type_byte(0x45).is_err());
    assert!(Channel::from_type_byte(0xF1).is_err());
    assert_eq!(Channel::from_type_byte(0x32).unwrap().number(), 4);
}

#[test]
fn decode_pixel_values_little_endian() {
    let pixels: Vec<u16> = (0..12).map(|i| 0x0100 * i as u16 + 0x0A).collect();
    let buf = response_buf(CMD_CAPTURE, 0x01, 0x03, &pixels);
    let response = Response::decode(&buf);

    let row = response.pixel_row(12);
    assert_eq!(row.len(), 12);
    for (i, value) in row.iter().enumerate() {
        assert_eq!(*value, pixels[i] as i32);
    }
}

#[test]
fn trim_read_command_layout() {
    let report = CommandReport::trim_read(Channel::new(2).unwrap());
    let buf = report.as_bytes();

    assert_eq!(buf[0], REPORT_ID);
    assert_eq!(buf[1], CMD_TRIM_READ);
    assert_eq!(buf[5], PARAM_TRIM_BLOCK);
    assert_eq!(buf[6], 1); // zero-based on the wire
}

#[test]
fn decode_trim_block_carries_values_and_stop_marker() {
    let mut buf = [0u8; HID_REPORT_LEN];
    buf[1] = CMD_TRIM_READ;
    buf[3] = CMD_TRIM_READ;
    buf[5] = PARAM_TRIM_BLOCK;
    buf[6] = MARKER_ACK_STOP;
    for (i, byte) in buf[7..7 + TRIM_VALUES_PER_CHANNEL].iter_mut().enumerate() {
        *byte = 0x30 + i as u8;
    }

    let response = Response::decode(&buf);
    assert_eq!(response.kind(), ResponseKind::TrimBlock { done: true });
    assert_eq!(response.trim_values().len(), TRIM_VALUES_PER_CHANNEL);
    assert_eq!(response.trim_values()[0], 0x30);
    assert_eq!(response.trim_values()[23], 0x30 + 23);

    buf[6] = 0x00;
    assert_eq!(
        Response::decode(&buf).kind(),
        ResponseKind::TrimBlock { done: false }
    );
}

#[test]
fn decode_ack_stop_marker() {
    let buf = response_buf(CMD_SET_PARAM, 0x07, MARKER_ACK_STOP, &[]);
    assert_eq!(
        Response::decode(&buf).kind(),
        ResponseKind::Ack { done: true }
    );

    let buf = response_buf(CMD_SET_PARAM, 0x07, 0x00, &[]);
    assert_eq!(
        Response::decode(&buf).kind(),
        ResponseKind::Ack { done: false }
    );
}

#[test]
fn decode_unknown_type_is_unrecognized() {
    let buf = response_buf(CMD_CAPTURE, 0x55, 0x00, &[]);
    assert_eq!(Response::decode(&buf).kind(), ResponseKind::Unrecognized);
}

#[test]
fn decode_data_type_with_wrong_command_is_unrecognized() {
    // Type byte looks like pixel data but the command code does not match.
    let buf = response_buf(0x09, 0x01, 0x00, &[0; 12]);
    assert_eq!(Response::decode(&buf).kind(), ResponseKind::Unrecognized);
}

#[test]
fn decode_never_fails_on_malformed_content() {
    let mut buf = [0u8; HID_REPORT_LEN];
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(37).wrapping_add(11);
    }
    // Whatever the content, a well-sized buffer decodes to some variant.
    let _ = Response::decode(&buf).kind();
}
