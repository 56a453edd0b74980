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

use crate::jsonmap::{self, invalid_type_error};
use crate::model::{MinerVendor, WirePayload};
use crate::ConfigError;

// Bitmain writes the pwm as a string even when the fans are firmware-controlled.
const AM_MODERN_AUTO_PWM: &str = "100";

/// How the miner drives its fans.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FanModeConfig {
    /// Firmware regulates fan speed against its temperature target.
    #[default]
    Normal,
    /// Fixed duty cycle, in percent.
    Manual { speed: u8 },
}

impl FanModeConfig {
    pub const ESPMINER_KEYS: [&'static str; 2] = ["autofanspeed", "fanspeed"];
    pub const AM_MODERN_KEYS: [&'static str; 2] = ["bitmain-fan-ctrl", "bitmain-fan-pwm"];

    pub fn normal() -> Self {
        FanModeConfig::Normal
    }

    pub fn manual(speed: u8) -> Self {
        FanModeConfig::Manual { speed }
    }

    pub fn as_espminer(&self) -> WirePayload {
        let mut payload = WirePayload::new();
        match self {
            FanModeConfig::Normal => {
                payload.insert("autofanspeed".to_string(), 1_i64.into());
            }
            FanModeConfig::Manual { speed } => {
                payload.insert("autofanspeed".to_string(), 0_i64.into());
                payload.insert("fanspeed".to_string(), (*speed).into());
            }
        }
        payload
    }

    /// `autofanspeed` must be present; without it the fan policy is unknown.
    pub fn from_espminer(payload: &WirePayload) -> Result<Self, ConfigError> {
        let vendor = MinerVendor::EspMiner;
        match jsonmap::get_i64(payload, "autofanspeed", vendor)? {
            1 => Ok(FanModeConfig::Normal),
            0 => {
                let speed = jsonmap::get_i64(payload, "fanspeed", vendor)?;
                Ok(FanModeConfig::Manual {
                    speed: fan_speed(speed, "fanspeed", vendor)?,
                })
            }
            other => Err(ConfigError::InvalidValue {
                key: "autofanspeed".to_string(),
                value: other.to_string(),
                vendor,
            }),
        }
    }

    pub fn as_am_modern(&self) -> WirePayload {
        let (manual, pwm) = match self {
            FanModeConfig::Normal => (false, AM_MODERN_AUTO_PWM.to_string()),
            FanModeConfig::Manual { speed } => (true, speed.to_string()),
        };
        let mut payload = WirePayload::new();
        payload.insert("bitmain-fan-ctrl".to_string(), manual.into());
        payload.insert("bitmain-fan-pwm".to_string(), pwm.into());
        payload
    }

    /// `bitmain-fan-ctrl` must be present. The pwm shows up as a string on
    /// most firmware and as a number on some, so both are accepted.
    pub fn from_am_modern(payload: &WirePayload) -> Result<Self, ConfigError> {
        let vendor = MinerVendor::AntminerModern;
        let key = "bitmain-fan-pwm";
        if !jsonmap::get_bool(payload, "bitmain-fan-ctrl", vendor)? {
            return Ok(FanModeConfig::Normal);
        }
        let speed = match jsonmap::get_value(payload, key, vendor)? {
            serde_json::Value::String(s) => {
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: s.clone(),
                        vendor,
                    })?
            }
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| invalid_type_error(key, "integer", vendor))?,
            _ => return Err(invalid_type_error(key, "string or integer", vendor)),
        };
        Ok(FanModeConfig::Manual {
            speed: fan_speed(speed, key, vendor)?,
        })
    }
}

fn fan_speed(value: i64, key: &str, vendor: MinerVendor) -> Result<u8, ConfigError> {
    u8::try_from(value).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        vendor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> WirePayload {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_espminer_normal() {
        let mode = FanModeConfig::from_espminer(&map(json!({"autofanspeed": 1, "fanspeed": 42})))
            .unwrap();
        assert_eq!(mode, FanModeConfig::Normal);
        assert_eq!(
            serde_json::Value::Object(mode.as_espminer()),
            json!({"autofanspeed": 1})
        );
    }

    #[test]
    fn test_espminer_manual() {
        let mode =
            FanModeConfig::from_espminer(&map(json!({"autofanspeed": 0, "fanspeed": 65}))).unwrap();
        assert_eq!(mode, FanModeConfig::manual(65));
        assert_eq!(
            serde_json::Value::Object(mode.as_espminer()),
            json!({"autofanspeed": 0, "fanspeed": 65})
        );
    }

    // autofanspeed is the precondition for reading any fan policy.
    #[test]
    fn test_espminer_requires_autofanspeed() {
        let err = FanModeConfig::from_espminer(&map(json!({"fanspeed": 65}))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "autofanspeed"));
        assert!(err.is_malformed_payload());

        let err = FanModeConfig::from_espminer(&map(json!({"autofanspeed": 0}))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "fanspeed"));

        let err = FanModeConfig::from_espminer(&map(json!({"autofanspeed": 2}))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = FanModeConfig::from_espminer(&map(json!({"autofanspeed": 0, "fanspeed": 300})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "fanspeed"));
    }

    #[test]
    fn test_am_modern() {
        let mode = FanModeConfig::from_am_modern(&map(
            json!({"bitmain-fan-ctrl": true, "bitmain-fan-pwm": "80"}),
        ))
        .unwrap();
        assert_eq!(mode, FanModeConfig::manual(80));

        let mode = FanModeConfig::from_am_modern(&map(
            json!({"bitmain-fan-ctrl": true, "bitmain-fan-pwm": 55}),
        ))
        .unwrap();
        assert_eq!(mode, FanModeConfig::manual(55));

        let mode = FanModeConfig::from_am_modern(&map(json!({"bitmain-fan-ctrl": false})))
            .unwrap();
        assert_eq!(mode, FanModeConfig::Normal);
        assert_eq!(
            serde_json::Value::Object(mode.as_am_modern()),
            json!({"bitmain-fan-ctrl": false, "bitmain-fan-pwm": "100"})
        );
    }

    #[test]
    fn test_am_modern_bad_pwm() {
        let err = FanModeConfig::from_am_modern(&map(
            json!({"bitmain-fan-ctrl": true, "bitmain-fan-pwm": "fast"}),
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = FanModeConfig::from_am_modern(&map(json!({"bitmain-fan-ctrl": "yes"})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeyType { .. }));
    }

    #[test]
    fn test_round_trip_every_vendor() {
        for mode in [FanModeConfig::normal(), FanModeConfig::manual(0), FanModeConfig::manual(100)]
        {
            assert_eq!(FanModeConfig::from_espminer(&mode.as_espminer()).unwrap(), mode);
            assert_eq!(FanModeConfig::from_am_modern(&mode.as_am_modern()).unwrap(), mode);
        }
    }
}
