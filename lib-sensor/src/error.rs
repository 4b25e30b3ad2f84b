// SPDX-License-Identifier: MIT

/// Errors surfaced by the session controller.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("no matching device could be opened")]
    DeviceNotFound,

    #[error("invalid {field}: {value} (allowed {allowed})")]
    InvalidConfig {
        field: &'static str,
        value: u32,
        allowed: &'static str,
    },

    #[error("device disconnected: {0}")]
    Disconnected(String),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

/// Errors raised by a HID transport implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("hid i/o failed: {0}")]
    Io(String),
}
