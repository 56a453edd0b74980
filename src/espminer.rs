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
use tracing::debug;

use crate::model::{MinerConfig, MinerVendor, WirePayload};
use crate::network::{MinerHttpClient, MinerWeb};
use crate::{ConfigError, Miner};

const SYSTEM_INFO: &str = "api/system/info";
const SYSTEM: &str = "api/system";
const RESTART: &str = "api/system/restart";

/// Device adapter for ESP-Miner / AxeOS (BitAxe family).
pub struct EspMiner<W: MinerWeb = MinerHttpClient> {
    web: W,
}

impl<W: MinerWeb> EspMiner<W> {
    pub fn new(web: W) -> Self {
        EspMiner { web }
    }

    /// Raw `system/info` document. Holds telemetry as well as settings;
    /// the telemetry half is for callers to read, `get_config` ignores it.
    pub fn system_info(&self) -> Result<WirePayload, ConfigError> {
        match self.web.get(SYSTEM_INFO)? {
            serde_json::Value::Object(info) => Ok(info),
            _ => Err(ConfigError::NotAnObject {
                vendor: MinerVendor::EspMiner,
            }),
        }
    }

    /// PATCH arbitrary settings. Most take effect after `reboot`.
    pub fn update_settings(&self, settings: &WirePayload) -> Result<(), ConfigError> {
        self.web.patch(SYSTEM, settings)
    }
}

impl<W: MinerWeb> Miner for EspMiner<W> {
    fn vendor(&self) -> MinerVendor {
        MinerVendor::EspMiner
    }

    fn get_config(&self) -> Result<MinerConfig, ConfigError> {
        let info = self.system_info()?;
        MinerConfig::from_espminer(&serde_json::Value::Object(info))
    }

    fn send_config(&self, config: &MinerConfig) -> Result<(), ConfigError> {
        let settings = config.as_espminer()?;
        debug!(
            "ESPMiner: sending {}",
            settings.keys().cloned().collect::<Vec<_>>().join(",")
        );
        self.update_settings(&settings)
    }

    fn reboot(&self) -> Result<(), ConfigError> {
        self.web.post(RESTART)
    }
}
