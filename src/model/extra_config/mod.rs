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
//! Vendor-only configuration that rides along with a `MinerConfig`.
//!
//! Each vendor that has settings outside the shared schema gets one record
//! type here. A record is a set of optional integer fields plus a static
//! `FieldMapping` to that vendor's wire keys; the table walk in
//! `VendorExtraConfig` does the rest.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field_map::FieldMapping;
use crate::jsonmap;
use crate::model::{MinerVendor, WirePayload};
use crate::ConfigError;

pub mod espminer;

use espminer::EspMinerExtraConfig;

pub trait VendorExtraConfig: Clone + Default + PartialEq + Into<ExtraConfig> {
    const VENDOR: MinerVendor;

    fn field_map() -> &'static FieldMapping;

    /// Storage for a canonical field name, or None if the record has no such field.
    /// Must answer for every name in `field_map()`.
    fn slot(&self, name: &str) -> Option<&Option<i64>>;

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<i64>>;

    fn get(&self, name: &str) -> Result<Option<i64>, ConfigError> {
        self.slot(name).copied().ok_or_else(|| ConfigError::UnknownField {
            vendor: Self::VENDOR,
            field: name.to_string(),
        })
    }

    fn set(&mut self, name: &str, value: Option<i64>) -> Result<(), ConfigError> {
        let slot = self.slot_mut(name).ok_or_else(|| ConfigError::UnknownField {
            vendor: Self::VENDOR,
            field: name.to_string(),
        })?;
        *slot = value;
        Ok(())
    }

    /// Wire fields for every set value, in table order. Unset fields are left out.
    fn to_wire(&self) -> WirePayload {
        let mut payload = WirePayload::new();
        for (name, wire) in Self::field_map().iter() {
            if let Some(Some(value)) = self.slot(name) {
                payload.insert(wire.to_string(), (*value).into());
            }
        }
        payload
    }

    /// Best effort, field by field. Unknown keys are ignored and a value that
    /// is not an integer leaves its field unset. Flags travel as 0/1, so a JSON
    /// boolean is not coerced and leaves its field unset too.
    fn from_wire(payload: &WirePayload) -> Self {
        let mut extra = Self::default();
        for (name, wire) in Self::field_map().iter() {
            let Some(value) = jsonmap::get_opt_value(payload, wire) else {
                continue;
            };
            let Some(value) = value.as_i64() else {
                debug!("{} {wire}: ignoring non-integer value {value}", Self::VENDOR);
                continue;
            };
            if let Some(slot) = extra.slot_mut(name) {
                *slot = Some(value);
            }
        }
        extra
    }

    fn is_unset(&self) -> bool {
        Self::field_map()
            .iter()
            .all(|(name, _)| matches!(self.slot(name), None | Some(None)))
    }
}

/// Vendor-specific extension of a `MinerConfig`, one variant per vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "vendor", rename_all = "snake_case")]
pub enum ExtraConfig {
    EspMiner(EspMinerExtraConfig),
}

impl ExtraConfig {
    pub fn vendor(&self) -> MinerVendor {
        match self {
            ExtraConfig::EspMiner(_) => EspMinerExtraConfig::VENDOR,
        }
    }

    /// Mapping table for a vendor, if that vendor has extra config at all.
    pub fn field_map_for(vendor: MinerVendor) -> Option<&'static FieldMapping> {
        match vendor {
            MinerVendor::EspMiner => Some(EspMinerExtraConfig::field_map()),
            MinerVendor::AntminerModern => None,
        }
    }

    pub fn to_wire(&self) -> WirePayload {
        match self {
            ExtraConfig::EspMiner(extra) => extra.to_wire(),
        }
    }

    /// Builds the variant for `vendor` from a raw payload.
    ///
    /// Returns None when the vendor has no variant, and also when none of the
    /// recognized fields were present: an all-unset record means "nothing
    /// observed", which callers must be able to tell apart from a record the
    /// user cleared.
    pub fn from_wire(vendor: MinerVendor, payload: &WirePayload) -> Option<ExtraConfig> {
        match vendor {
            MinerVendor::EspMiner => observed(EspMinerExtraConfig::from_wire(payload)),
            MinerVendor::AntminerModern => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        match self {
            ExtraConfig::EspMiner(extra) => extra.is_unset(),
        }
    }

    pub fn as_espminer(&self) -> Option<&EspMinerExtraConfig> {
        match self {
            ExtraConfig::EspMiner(extra) => Some(extra),
        }
    }

    pub fn as_espminer_mut(&mut self) -> Option<&mut EspMinerExtraConfig> {
        match self {
            ExtraConfig::EspMiner(extra) => Some(extra),
        }
    }
}

impl From<EspMinerExtraConfig> for ExtraConfig {
    fn from(extra: EspMinerExtraConfig) -> Self {
        ExtraConfig::EspMiner(extra)
    }
}

fn observed<E: VendorExtraConfig>(extra: E) -> Option<ExtraConfig> {
    if extra.is_unset() {
        None
    } else {
        Some(extra.into())
    }
}
