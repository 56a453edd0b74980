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

use crate::field_map::FieldMapping;
use crate::model::extra_config::VendorExtraConfig;
use crate::model::MinerVendor;

/// ESP-Miner keys for the display, overclock and fan extras.
/// AxeOS mixes casing conventions, so every key is spelled out.
pub static ESPMINER_FIELDS: FieldMapping = FieldMapping::new(
    MinerVendor::EspMiner,
    &[
        ("rotation", "rotation"),
        ("invertscreen", "invertscreen"),
        ("display_timeout", "displayTimeout"),
        ("overheat_mode", "overheat_mode"),
        ("overclock_enabled", "overclockEnabled"),
        ("stats_frequency", "statsFrequency"),
        ("min_fan_speed", "minFanSpeed"),
    ],
);

/// Settings only ESP-Miner (BitAxe) firmware has.
/// The 0/1 flags are kept as integers, the way the API reports them.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspMinerExtraConfig {
    /// Display rotation in degrees: 0, 90, 180 or 270.
    pub rotation: Option<i64>,
    pub invertscreen: Option<i64>,
    /// Seconds before the display blanks.
    pub display_timeout: Option<i64>,
    pub overheat_mode: Option<i64>,
    pub overclock_enabled: Option<i64>,
    pub stats_frequency: Option<i64>,
    /// Floor for the automatic fan curve, in percent.
    pub min_fan_speed: Option<i64>,
}

impl VendorExtraConfig for EspMinerExtraConfig {
    const VENDOR: MinerVendor = MinerVendor::EspMiner;

    fn field_map() -> &'static FieldMapping {
        &ESPMINER_FIELDS
    }

    fn slot(&self, name: &str) -> Option<&Option<i64>> {
        Some(match name {
            "rotation" => &self.rotation,
            "invertscreen" => &self.invertscreen,
            "display_timeout" => &self.display_timeout,
            "overheat_mode" => &self.overheat_mode,
            "overclock_enabled" => &self.overclock_enabled,
            "stats_frequency" => &self.stats_frequency,
            "min_fan_speed" => &self.min_fan_speed,
            _ => return None,
        })
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<i64>> {
        Some(match name {
            "rotation" => &mut self.rotation,
            "invertscreen" => &mut self.invertscreen,
            "display_timeout" => &mut self.display_timeout,
            "overheat_mode" => &mut self.overheat_mode,
            "overclock_enabled" => &mut self.overclock_enabled,
            "stats_frequency" => &mut self.stats_frequency,
            "min_fan_speed" => &mut self.min_fan_speed,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WirePayload;
    use crate::ConfigError;
    use serde_json::json;

    fn full() -> EspMinerExtraConfig {
        EspMinerExtraConfig {
            rotation: Some(90),
            invertscreen: Some(1),
            display_timeout: Some(5),
            overheat_mode: Some(0),
            overclock_enabled: Some(1),
            stats_frequency: Some(10),
            min_fan_speed: Some(30),
        }
    }

    fn wire(value: serde_json::Value) -> WirePayload {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_default_is_unset() {
        let extra = EspMinerExtraConfig::default();
        assert!(extra.is_unset());
        for (name, _) in ESPMINER_FIELDS.iter() {
            assert_eq!(extra.get(name).unwrap(), None);
        }
        assert!(!full().is_unset());
    }

    #[test]
    fn test_to_wire_excludes_unset() {
        let extra = EspMinerExtraConfig {
            rotation: Some(90),
            display_timeout: Some(5),
            ..Default::default()
        };
        let payload = extra.to_wire();
        assert_eq!(
            serde_json::Value::Object(payload.clone()),
            json!({"rotation": 90, "displayTimeout": 5})
        );
        assert!(!payload.contains_key("invertscreen"));
        assert!(EspMinerExtraConfig::default().to_wire().is_empty());
    }

    // Keys come out in table order with the firmware's own casing.
    #[test]
    fn test_to_wire_key_names_and_order() {
        let keys: Vec<String> = full().to_wire().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "rotation",
                "invertscreen",
                "displayTimeout",
                "overheat_mode",
                "overclockEnabled",
                "statsFrequency",
                "minFanSpeed",
            ]
        );
    }

    #[test]
    fn test_from_wire_all_fields() {
        let payload = wire(json!({
            "rotation": 90,
            "invertscreen": 1,
            "displayTimeout": 5,
            "overheat_mode": 0,
            "overclockEnabled": 1,
            "statsFrequency": 10,
            "minFanSpeed": 30,
        }));
        assert_eq!(EspMinerExtraConfig::from_wire(&payload), full());
    }

    #[test]
    fn test_from_wire_three_fields() {
        let payload = wire(json!({"rotation": 90, "invertscreen": 1, "displayTimeout": 5}));
        let extra = EspMinerExtraConfig::from_wire(&payload);
        assert_eq!(
            extra,
            EspMinerExtraConfig {
                rotation: Some(90),
                invertscreen: Some(1),
                display_timeout: Some(5),
                ..Default::default()
            }
        );
        assert_eq!(extra.to_wire(), payload);
    }

    #[test]
    fn test_from_wire_partial() {
        let extra = EspMinerExtraConfig::from_wire(&wire(json!({"rotation": 180, "invertscreen": 0})));
        assert_eq!(extra.rotation, Some(180));
        assert_eq!(extra.invertscreen, Some(0));
        assert_eq!(extra.display_timeout, None);
        assert_eq!(extra.overheat_mode, None);
    }

    // Canonical spellings and telemetry are not recognized as wire keys.
    #[test]
    fn test_from_wire_ignores_unknown_keys() {
        let extra = EspMinerExtraConfig::from_wire(&wire(json!({
            "display_timeout": 5,
            "networkDifficulty": 126_982_285_146_989_u64,
            "bestDiff": "4.29G",
            "minFanSpeed": 25,
        })));
        assert_eq!(
            extra,
            EspMinerExtraConfig {
                min_fan_speed: Some(25),
                ..Default::default()
            }
        );
    }

    // A bad value only costs its own field.
    #[test]
    fn test_from_wire_bad_values_are_unset() {
        let extra = EspMinerExtraConfig::from_wire(&wire(json!({
            "rotation": "ninety",
            "invertscreen": true,
            "displayTimeout": null,
            "statsFrequency": 2.5,
            "overheat_mode": 1,
        })));
        assert_eq!(
            extra,
            EspMinerExtraConfig {
                overheat_mode: Some(1),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_round_trip_law() {
        let partial = EspMinerExtraConfig {
            overclock_enabled: Some(0),
            min_fan_speed: Some(40),
            ..Default::default()
        };
        for extra in [full(), partial, EspMinerExtraConfig::default()] {
            assert_eq!(EspMinerExtraConfig::from_wire(&extra.to_wire()), extra);
        }
    }

    // to_wire(from_wire(p)) keeps only recognized, non-null keys of p, unchanged.
    #[test]
    fn test_to_wire_of_from_wire_is_subset() {
        let payload = wire(json!({
            "rotation": 270,
            "statsFrequency": 0,
            "minFanSpeed": null,
            "hostname": "bitaxe",
            "frequency": 525,
        }));
        let out = EspMinerExtraConfig::from_wire(&payload).to_wire();
        assert_eq!(out.len(), 2);
        for (key, value) in &out {
            assert_eq!(payload.get(key), Some(value));
        }
    }

    #[test]
    fn test_get_set_by_name() {
        let mut extra = EspMinerExtraConfig::default();
        extra.set("stats_frequency", Some(15)).unwrap();
        assert_eq!(extra.stats_frequency, Some(15));
        assert_eq!(extra.get("stats_frequency").unwrap(), Some(15));
        extra.set("stats_frequency", None).unwrap();
        assert!(extra.is_unset());

        let err = extra.set("network_difficulty", Some(1)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { .. }));
        assert!(extra.get("statsFrequency").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let value = serde_json::to_value(full()).unwrap();
        assert_eq!(value["display_timeout"], json!(5));
        let back: EspMinerExtraConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, full());

        let empty = serde_json::to_value(EspMinerExtraConfig::default()).unwrap();
        assert_eq!(empty, json!({}));
    }
}
