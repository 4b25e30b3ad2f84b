// SPDX-License-Identifier: MIT

use crate::constants::HID_REPORT_LEN;
use crate::error::TransportError;
use hidapi::{HidApi, HidDevice};
use log::debug;
use std::ffi::CString;

/// The five transport operations the protocol engine needs. Platform
/// specifics stay behind this seam; the engine is written once against it.
pub trait HidTransport {
    type Handle;

    /// Paths of all attached devices matching the given identifiers.
    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Vec<String>;

    fn open(&mut self, path: &str) -> Result<Self::Handle, TransportError>;

    /// Writes one full report; returns the number of bytes accepted.
    fn write(
        &mut self,
        handle: &mut Self::Handle,
        report: &[u8; HID_REPORT_LEN],
    ) -> Result<usize, TransportError>;

    /// Reads one full report. A return of 0 means the timeout elapsed
    /// without data.
    fn read_timeout(
        &mut self,
        handle: &mut Self::Handle,
        report: &mut [u8; HID_REPORT_LEN],
        timeout_ms: i32,
    ) -> Result<usize, TransportError>;

    fn close(&mut self, handle: Self::Handle);
}

/// Transport backed by hidapi, used against real hardware.
pub struct HidApiTransport {
    api: HidApi,
}

impl HidApiTransport {
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(Self { api })
    }
}

impl HidTransport for HidApiTransport {
    type Handle = HidDevice;

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Vec<String> {
        if let Err(e) = self.api.refresh_devices() {
            debug!("Device list refresh failed: {e}");
        }
        self.api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| info.path().to_string_lossy().into_owned())
            .collect()
    }

    fn open(&mut self, path: &str) -> Result<Self::Handle, TransportError> {
        let cpath = CString::new(path).map_err(|e| TransportError::Open {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        self.api.open_path(&cpath).map_err(|e| TransportError::Open {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn write(
        &mut self,
        handle: &mut Self::Handle,
        report: &[u8; HID_REPORT_LEN],
    ) -> Result<usize, TransportError> {
        handle
            .write(report)
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    fn read_timeout(
        &mut self,
        handle: &mut Self::Handle,
        report: &mut [u8; HID_REPORT_LEN],
        timeout_ms: i32,
    ) -> Result<usize, TransportError> {
        handle
            .read_timeout(&mut report[..], timeout_ms)
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    fn close(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}
