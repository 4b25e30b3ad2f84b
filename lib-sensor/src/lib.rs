// SPDX-License-Identifier: MIT

//! # ULS24 HID Communication Library
//!
//! Host-side driver for a small USB HID optical sensor, including:
//! - Device discovery and connection management
//! - Fixed-size report encoding and decoding
//! - The multi-report frame capture protocol
//! - Trim (factory calibration) hooks

pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod report;
pub mod session;
pub mod transport;
pub mod trim;

// Re-export commonly used types
pub use config::{Channel, Gain, SessionConfig};
pub use constants::*;
pub use error::{SensorError, TransportError};
pub use frame::{Frame, FrameKind};
pub use report::{CommandReport, Response, ResponseKind};
pub use session::SensorSession;
pub use transport::{HidApiTransport, HidTransport};
pub use trim::{Calibration, FactoryCalibration, TrimTable};
