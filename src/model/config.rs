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
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::extra_config::ExtraConfig;
use crate::model::fan_mode::FanModeConfig;
use crate::model::pools::PoolConfig;
use crate::model::{MinerVendor, WirePayload};
use crate::ConfigError;

/// Vendor-neutral miner configuration.
///
/// Build one directly or read it back with `from_wire`, change it, and hand
/// `as_wire` to the adapter for the same vendor. It is a plain value: cloning
/// gives a fully independent copy, extra config included.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerConfig {
    #[serde(default)]
    pub pools: PoolConfig,
    #[serde(default)]
    pub fan_mode: FanModeConfig,
    pub extra_config: Option<ExtraConfig>,
}

impl MinerConfig {
    pub fn with_extra_config(mut self, extra: impl Into<ExtraConfig>) -> Self {
        self.extra_config = Some(extra.into());
        self
    }

    /// Wire keys owned by the shared schema for a vendor.
    /// Extra config tables must never reuse one of these.
    pub fn base_wire_keys(vendor: MinerVendor) -> Vec<&'static str> {
        match vendor {
            MinerVendor::EspMiner => PoolConfig::ESPMINER_KEYS
                .iter()
                .chain(FanModeConfig::ESPMINER_KEYS.iter())
                .copied()
                .collect(),
            MinerVendor::AntminerModern => PoolConfig::AM_MODERN_KEYS
                .iter()
                .chain(FanModeConfig::AM_MODERN_KEYS.iter())
                .copied()
                .collect(),
        }
    }

    /// Flat payload for `vendor`: shared fields first, then extra config.
    ///
    /// Fails with `ExtraConfigMismatch` if the attached extra config belongs
    /// to another vendor, rather than sending a payload the miner would misread.
    pub fn as_wire(&self, vendor: MinerVendor) -> Result<WirePayload, ConfigError> {
        let mut payload = match vendor {
            MinerVendor::EspMiner => {
                let mut payload = self.pools.as_espminer();
                payload.extend(self.fan_mode.as_espminer());
                payload
            }
            MinerVendor::AntminerModern => {
                let mut payload = self.pools.as_am_modern();
                payload.extend(self.fan_mode.as_am_modern());
                payload
            }
        };
        if let Some(extra) = &self.extra_config {
            if extra.vendor() != vendor {
                return Err(ConfigError::ExtraConfigMismatch {
                    vendor,
                    attached: extra.vendor(),
                });
            }
            for (key, value) in extra.to_wire() {
                debug_assert!(
                    !payload.contains_key(&key),
                    "{vendor} extra config key {key} collides with a base field"
                );
                payload.insert(key, value);
            }
        }
        Ok(payload)
    }

    /// Parses a raw vendor payload.
    ///
    /// Shared fields are all-or-nothing: any malformed one fails the whole
    /// call. Extra config is read field by field and is left as None when
    /// none of its fields were present.
    pub fn from_wire(vendor: MinerVendor, payload: &serde_json::Value) -> Result<Self, ConfigError> {
        let map = payload
            .as_object()
            .ok_or(ConfigError::NotAnObject { vendor })?;
        let (pools, fan_mode) = match vendor {
            MinerVendor::EspMiner => (
                PoolConfig::from_espminer(map)?,
                FanModeConfig::from_espminer(map)?,
            ),
            MinerVendor::AntminerModern => (
                PoolConfig::from_am_modern(map)?,
                FanModeConfig::from_am_modern(map)?,
            ),
        };
        let extra_config = ExtraConfig::from_wire(vendor, map);
        debug!(
            "{vendor}: {} pools, fan {:?}, extra config {}",
            pools.pools.len(),
            fan_mode,
            if extra_config.is_some() { "present" } else { "absent" }
        );
        Ok(MinerConfig {
            pools,
            fan_mode,
            extra_config,
        })
    }

    pub fn as_espminer(&self) -> Result<WirePayload, ConfigError> {
        self.as_wire(MinerVendor::EspMiner)
    }

    pub fn from_espminer(web_system_info: &serde_json::Value) -> Result<Self, ConfigError> {
        Self::from_wire(MinerVendor::EspMiner, web_system_info)
    }

    pub fn as_am_modern(&self) -> Result<WirePayload, ConfigError> {
        self.as_wire(MinerVendor::AntminerModern)
    }

    pub fn from_am_modern(web_conf: &serde_json::Value) -> Result<Self, ConfigError> {
        Self::from_wire(MinerVendor::AntminerModern, web_conf)
    }
}
