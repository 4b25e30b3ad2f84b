// SPDX-License-Identifier: MIT

use crate::config::Channel;
use crate::constants::TRIM_VALUES_PER_CHANNEL;
use crate::error::SensorError;

/// Per-unit factory calibration values for one channel. The engine
/// carries these around capture as-is; their interpretation belongs to
/// the calibration collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimTable {
    channel: Channel,
    values: Vec<u8>,
}

impl TrimTable {
    pub fn new(channel: Channel, values: Vec<u8>) -> Self {
        Self { channel, values }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

/// Calibration storage collaborator: per-channel trim retrieval and a
/// factory reset, consumed as pre/post hooks around frame capture.
pub trait Calibration {
    fn read_trim(&mut self, channel: Channel) -> Result<TrimTable, SensorError>;

    fn reset_trim(&mut self) -> Result<(), SensorError>;
}

/// Built-in calibration source that hands out flat factory defaults.
/// Stands in when no per-unit trim file is available.
#[derive(Debug, Default)]
pub struct FactoryCalibration {
    resets: u32,
}

impl FactoryCalibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many factory resets have been requested on this source.
    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl Calibration for FactoryCalibration {
    fn read_trim(&mut self, channel: Channel) -> Result<TrimTable, SensorError> {
        Ok(TrimTable::new(channel, vec![0; TRIM_VALUES_PER_CHANNEL]))
    }

    fn reset_trim(&mut self) -> Result<(), SensorError> {
        self.resets += 1;
        Ok(())
    }
}
