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
//! Canonical configuration for heterogeneous ASIC miners.
//!
//! A [`MinerConfig`] holds what every miner understands (pools, fan policy)
//! and optionally an [`ExtraConfig`] with settings only one vendor has. The
//! model translates to and from each vendor's wire payload; the device
//! adapters ([`Miner`]) move those payloads over the network.

pub mod field_map;
pub mod jsonmap;
pub mod model;

mod error;
mod espminer;
mod network;

pub use error::ConfigError;
pub use espminer::EspMiner;
pub use field_map::FieldMapping;
pub use model::extra_config::espminer::ESPMINER_FIELDS;
pub use model::{
    EspMinerExtraConfig, ExtraConfig, FanModeConfig, MinerConfig, MinerVendor, Pool, PoolConfig,
    VendorExtraConfig, WirePayload,
};
pub use network::{Endpoint, MinerClientPool, MinerClientPoolBuilder, MinerHttpClient, MinerWeb};

/// Interface to one miner's configuration API. All calls make one or more
/// network requests through the adapter's transport.
pub trait Miner: Send + Sync {
    /// Wire format this adapter speaks.
    fn vendor(&self) -> MinerVendor;

    /// Fetch the current configuration.
    fn get_config(&self) -> Result<MinerConfig, ConfigError>;

    /// Write a configuration. Fails before any request is made if the
    /// config carries extra config for a different vendor.
    fn send_config(&self, config: &MinerConfig) -> Result<(), ConfigError>;

    /// Restart the miner so pending settings take effect.
    fn reboot(&self) -> Result<(), ConfigError>;
}
