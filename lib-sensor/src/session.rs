// SPDX-License-Identifier: MIT

use crate::config::{Channel, Gain, SessionConfig};
use crate::constants::{
    CHANNEL_COUNT, DEFAULT_READ_TIMEOUT_MS, HID_REPORT_LEN, MARKER_COMPLETE, MARKER_MORE_DATA,
    MAX_TRANSFER_CYCLES, PRODUCT_ID, VENDOR_ID,
};
use crate::error::SensorError;
use crate::frame::{Frame, FrameKind};
use crate::report::{CommandReport, Response, ResponseKind};
use crate::transport::HidTransport;
use crate::trim::{Calibration, FactoryCalibration, TrimTable};
use log::{debug, error, info, warn};

/// In-progress frame plus the bookkeeping needed to place rows
/// consistently across transfer cycles.
struct FrameAssembly {
    frame: Frame,
    channel: Channel,
    next_row: usize,
}

impl FrameAssembly {
    fn new(kind: FrameKind, channel: Channel) -> Self {
        Self {
            frame: Frame::new(kind),
            channel,
            next_row: 0,
        }
    }

    fn push_row(&mut self, values: &[i32]) -> Result<(), SensorError> {
        if self.next_row >= self.frame.side() {
            return Err(SensorError::ProtocolViolation(format!(
                "device sent more than {} rows",
                self.frame.side()
            )));
        }
        self.frame.set_row(self.next_row, values);
        self.next_row += 1;
        Ok(())
    }
}

/// Owns the device connection and runs the capture protocol.
///
/// One session owns at most one open handle; opening a new one closes
/// the previous one. All I/O is blocking and strictly sequential: one
/// write, then one read with a timeout, never overlapped. Failures are
/// surfaced to the caller without internal retries.
pub struct SensorSession<T: HidTransport> {
    transport: T,
    handle: Option<T::Handle>,
    config: SessionConfig,
    calibration: Box<dyn Calibration>,
    trim: [Option<TrimTable>; 4],
    vendor_id: u16,
    product_id: u16,
    read_timeout_ms: i32,
}

impl<T: HidTransport> SensorSession<T> {
    pub fn new(transport: T) -> Self {
        Self::with_calibration(transport, Box::new(FactoryCalibration::new()))
    }

    pub fn with_calibration(transport: T, calibration: Box<dyn Calibration>) -> Self {
        Self {
            transport,
            handle: None,
            config: SessionConfig::default(),
            calibration,
            trim: Default::default(),
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }

    pub fn with_device_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    pub fn with_read_timeout(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self
    }

    /// Enumerates matching devices and opens the first path that
    /// succeeds, replacing any previously held handle.
    pub fn discover(&mut self) -> Result<(), SensorError> {
        self.invalidate_handle();
        info!(
            "Looking for device {:04x}:{:04x}...",
            self.vendor_id, self.product_id
        );
        for path in self.transport.enumerate(self.vendor_id, self.product_id) {
            match self.transport.open(&path) {
                Ok(handle) => {
                    info!("Opened device at {path}");
                    self.handle = Some(handle);
                    return Ok(());
                }
                Err(e) => debug!("Skipping {path}: {e}"),
            }
        }
        warn!("No matching device could be opened");
        Err(SensorError::DeviceNotFound)
    }

    /// Validates and stores a new capture configuration. Performs no
    /// I/O; on a validation failure the previous configuration stays.
    pub fn configure(
        &mut self,
        channel: u8,
        gain: Gain,
        integration_ms: u32,
    ) -> Result<(), SensorError> {
        let config = SessionConfig::new(channel, gain, integration_ms)?;
        debug!("Configuration set: {config}");
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Pushes the stored configuration to the device as individual
    /// parameter writes, each answered by one acknowledgement report.
    pub fn apply_config(&mut self) -> Result<(), SensorError> {
        if self.handle.is_none() {
            self.discover()?;
        }
        let reports = [
            CommandReport::select_channel(self.config.channel()),
            CommandReport::gain_mode(self.config.gain()),
            CommandReport::integration_time(self.config.integration_ms()),
        ];
        for report in reports {
            self.write_report(&report)?;
            let response = self.read_report()?;
            debug!("Parameter response: {response}");
        }
        Ok(())
    }

    /// Captures one full frame with the stored configuration.
    ///
    /// Runs write/read cycles until the device signals completion. Any
    /// failure mid-transfer discards the accumulated frame; partial
    /// pixel data is never returned.
    pub fn capture_frame(&mut self) -> Result<Frame, SensorError> {
        if self.handle.is_none() {
            debug!("Capture: no open handle, running discovery first");
            self.discover()?;
        }

        let request = CommandReport::capture(&self.config);
        debug!("Capture: transferring with {}", self.config);

        let mut assembly: Option<FrameAssembly> = None;
        let mut finished = false;

        for _ in 0..MAX_TRANSFER_CYCLES {
            self.write_report(&request)?;
            let response = self.read_report()?;

            match response.kind() {
                ResponseKind::PixelRow { channel, kind } => {
                    let slot =
                        assembly.get_or_insert_with(|| FrameAssembly::new(kind, channel));
                    if slot.channel != channel {
                        error!(
                            "Channel changed mid-transfer: {} then {}",
                            slot.channel, channel
                        );
                        return Err(SensorError::ProtocolViolation(format!(
                            "channel changed mid-transfer: {} then {}",
                            slot.channel, channel
                        )));
                    }
                    if slot.frame.kind() != kind {
                        return Err(SensorError::ProtocolViolation(
                            "frame size changed mid-transfer".into(),
                        ));
                    }
                    slot.push_row(&response.pixel_row(kind.side()))?;
                    if response.marker() == MARKER_COMPLETE {
                        finished = true;
                        break;
                    }
                    if response.marker() == MARKER_MORE_DATA {
                        debug!("More data pending after row {}", slot.next_row);
                    }
                }
                ResponseKind::Ack { done } => {
                    if done {
                        finished = true;
                        break;
                    }
                }
                ResponseKind::TrimBlock { .. } => {
                    debug!("Ignoring trim block during capture: {response}");
                }
                ResponseKind::Unrecognized => {
                    debug!("Ignoring unrecognized response: {response}");
                }
            }
        }

        if finished {
            return match assembly {
                Some(slot) => {
                    debug!("Capture complete: {} rows assembled", slot.next_row);
                    Ok(slot.frame)
                }
                None => Err(SensorError::ProtocolViolation(
                    "transfer ended without pixel data".into(),
                )),
            };
        }
        Err(SensorError::ProtocolViolation(format!(
            "transfer did not terminate within {MAX_TRANSFER_CYCLES} cycles"
        )))
    }

    /// Loads the trim table of every channel from the calibration
    /// collaborator. Called once at session start.
    pub fn load_trim(&mut self) -> Result<(), SensorError> {
        for number in 1..=CHANNEL_COUNT {
            let channel = Channel::new(number)?;
            let table = self.calibration.read_trim(channel)?;
            debug!(
                "Loaded trim for channel {channel} ({} values)",
                table.values().len()
            );
            self.trim[channel.index() as usize] = Some(table);
        }
        Ok(())
    }

    /// Reads one channel's factory trim block from the device itself,
    /// running write/read cycles until the stop marker arrives. The
    /// table is cached alongside the collaborator-loaded ones.
    pub fn read_device_trim(&mut self, channel: Channel) -> Result<TrimTable, SensorError> {
        if self.handle.is_none() {
            self.discover()?;
        }
        let request = CommandReport::trim_read(channel);
        debug!("Reading device trim for channel {channel}");

        let mut values = Vec::new();
        let mut finished = false;

        for _ in 0..MAX_TRANSFER_CYCLES {
            self.write_report(&request)?;
            let response = self.read_report()?;

            match response.kind() {
                ResponseKind::TrimBlock { done } => {
                    values.extend_from_slice(response.trim_values());
                    if done {
                        finished = true;
                        break;
                    }
                }
                ResponseKind::Ack { done: true } => {
                    finished = true;
                    break;
                }
                _ => debug!("Ignoring response during trim read: {response}"),
            }
        }

        if !finished {
            return Err(SensorError::ProtocolViolation(format!(
                "trim read did not stop within {MAX_TRANSFER_CYCLES} cycles"
            )));
        }
        if values.is_empty() {
            return Err(SensorError::ProtocolViolation(
                "trim read ended without trim data".into(),
            ));
        }
        let table = TrimTable::new(channel, values);
        self.trim[channel.index() as usize] = Some(table.clone());
        Ok(table)
    }

    /// Resets the calibration collaborator to factory defaults.
    pub fn reset_trim(&mut self) -> Result<(), SensorError> {
        self.calibration.reset_trim()
    }

    pub fn trim(&self, channel: Channel) -> Option<&TrimTable> {
        self.trim[channel.index() as usize].as_ref()
    }

    /// Releases the device handle. Idempotent.
    pub fn close(&mut self) {
        if self.handle.is_some() {
            info!("Closing device");
        }
        self.invalidate_handle();
    }

    fn invalidate_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.transport.close(handle);
        }
    }

    fn write_report(&mut self, report: &CommandReport) -> Result<(), SensorError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(SensorError::DeviceNotFound);
        };
        debug!("HID TX: {:02x?}", &report.as_bytes()[..16]);
        if let Err(e) = self.transport.write(handle, report.as_bytes()) {
            error!("Write failed: {e}");
            self.invalidate_handle();
            return Err(SensorError::Disconnected(e.to_string()));
        }
        Ok(())
    }

    fn read_report(&mut self) -> Result<Response, SensorError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(SensorError::DeviceNotFound);
        };
        let mut buf = [0u8; HID_REPORT_LEN];
        match self.transport.read_timeout(handle, &mut buf, self.read_timeout_ms) {
            Ok(0) => {
                warn!("Read timed out after {} ms", self.read_timeout_ms);
                self.invalidate_handle();
                Err(SensorError::Disconnected("read timed out".into()))
            }
            Ok(n) => {
                debug!("HID RX ({n} bytes): {:02x?}", &buf[..16]);
                Ok(Response::decode(&buf))
            }
            Err(e) => {
                error!("Read failed: {e}");
                self.invalidate_handle();
                Err(SensorError::Disconnected(e.to_string()))
            }
        }
    }
}
