/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod config;
pub mod extra_config;
pub mod fan_mode;
pub mod pools;

pub use config::MinerConfig;
pub use extra_config::{espminer::EspMinerExtraConfig, ExtraConfig, VendorExtraConfig};
pub use fan_mode::FanModeConfig;
pub use pools::{Pool, PoolConfig};

/// A raw vendor payload, exactly as exchanged with the miner's API.
/// Insertion order is kept so generated payloads are deterministic.
pub type WirePayload = serde_json::Map<String, serde_json::Value>;

/// The wire formats this crate can translate a `MinerConfig` to and from.
/// Picking the right one for an address is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Hash, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinerVendor {
    /// ESP-Miner / AxeOS (BitAxe and its forks), JSON over HTTP.
    EspMiner,
    /// Bitmain stock firmware on current Antminers, get_miner_conf.cgi document.
    AntminerModern,
}

impl MinerVendor {
    pub const ALL: [MinerVendor; 2] = [MinerVendor::EspMiner, MinerVendor::AntminerModern];
}

impl fmt::Display for MinerVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for MinerVendor {
    type Err = InvalidValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "espminer" | "esp_miner" | "esp-miner" | "axeos" | "bitaxe" => Ok(Self::EspMiner),
            "antminermodern" | "antminer_modern" | "antminer" | "am_modern" | "bitmain" => {
                Ok(Self::AntminerModern)
            }
            x => Err(InvalidValueError(format!("Invalid MinerVendor value: {x}"))),
        }
    }
}

#[derive(Debug)]
pub struct InvalidValueError(pub String);

impl std::error::Error for InvalidValueError {}

impl fmt::Display for InvalidValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
