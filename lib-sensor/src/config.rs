// SPDX-License-Identifier: MIT

use crate::constants::{CHANNEL_COUNT, MAX_INTEGRATION_MS, MIN_INTEGRATION_MS};
use crate::error::SensorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four sensor channels, numbered 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Channel(u8);

impl Channel {
    pub fn new(number: u8) -> Result<Self, SensorError> {
        if (1..=CHANNEL_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(SensorError::InvalidConfig {
                field: "channel",
                value: number as u32,
                allowed: "1-4",
            })
        }
    }

    /// One-based channel number as presented to callers.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index as carried on the wire.
    pub fn index(self) -> u8 {
        self.0 - 1
    }

    /// Recovers the channel from a response type byte's high nibble,
    /// rejecting nibbles outside the four channels.
    pub fn from_type_byte(type_byte: u8) -> Result<Self, SensorError> {
        Self::new((type_byte >> 4) + 1)
    }
}

impl TryFrom<u8> for Channel {
    type Error = SensorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> u8 {
        channel.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sensor amplification setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gain {
    High,
    Low,
}

impl Gain {
    /// Flag byte as carried on the wire: 0 for high gain, 1 for low gain.
    pub fn flag(self) -> u8 {
        match self {
            Gain::High => 0,
            Gain::Low => 1,
        }
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gain::High => write!(f, "high"),
            Gain::Low => write!(f, "low"),
        }
    }
}

/// Validated capture configuration held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    channel: Channel,
    gain: Gain,
    integration_ms: u32,
}

impl SessionConfig {
    /// Validates all fields before anything touches the device.
    pub fn new(channel: u8, gain: Gain, integration_ms: u32) -> Result<Self, SensorError> {
        let channel = Channel::new(channel)?;
        if !(MIN_INTEGRATION_MS..=MAX_INTEGRATION_MS).contains(&integration_ms) {
            return Err(SensorError::InvalidConfig {
                field: "integration time",
                value: integration_ms,
                allowed: "1-66000 ms",
            });
        }
        Ok(Self {
            channel,
            gain,
            integration_ms,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn integration_ms(&self) -> u32 {
        self.integration_ms
    }
}

impl Default for SessionConfig {
    /// Channel 1, low gain, 30 ms: the power-on values the vendor tools use.
    fn default() -> Self {
        Self {
            channel: Channel(1),
            gain: Gain::Low,
            integration_ms: 30,
        }
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel {}, {} gain, {} ms",
            self.channel, self.gain, self.integration_ms
        )
    }
}
