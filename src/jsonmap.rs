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
// jsonmap.rs
// Helper functions for pulling typed values out of vendor wire payloads.
// Every miner API hands us a loosely typed JSON object, so this happens a lot.

use std::collections::HashMap;

use crate::model::MinerVendor;
use crate::ConfigError;

// JsonMap is a trait that abstracts over serde_json::Map and HashMap,
// allowing us to write generic functions that work with both.
pub trait JsonMap {
    // get_value retrieves a reference to a JSON value by key.
    fn get_value(&self, key: &str) -> Option<&serde_json::Value>;
}

impl JsonMap for serde_json::Map<String, serde_json::Value> {
    fn get_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)
    }
}

impl JsonMap for HashMap<String, serde_json::Value> {
    fn get_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)
    }
}

fn missing_key_error(key: &str, vendor: MinerVendor) -> ConfigError {
    ConfigError::MissingKey {
        key: key.to_string(),
        vendor,
    }
}

pub(crate) fn invalid_type_error(key: &str, expected_type: &str, vendor: MinerVendor) -> ConfigError {
    ConfigError::InvalidKeyType {
        key: key.to_string(),
        expected_type: expected_type.to_string(),
        vendor,
    }
}

// get_value retrieves a JSON value from a map, returning MissingKey
// if the key is not found or holds null.
pub fn get_value<'a, M: JsonMap>(
    map: &'a M,
    key: &str,
    vendor: MinerVendor,
) -> Result<&'a serde_json::Value, ConfigError> {
    get_opt_value(map, key).ok_or_else(|| missing_key_error(key, vendor))
}

// get_opt_value treats an explicit null the same as an absent key.
// Firmware tends to send null for settings it has never persisted.
pub fn get_opt_value<'a, M: JsonMap>(map: &'a M, key: &str) -> Option<&'a serde_json::Value> {
    map.get_value(key).filter(|v| !v.is_null())
}

// get_str extracts a string value, returning appropriate errors
// if the key is missing or the value is not a string.
pub fn get_str<'a, M: JsonMap>(
    map: &'a M,
    key: &str,
    vendor: MinerVendor,
) -> Result<&'a str, ConfigError> {
    get_value(map, key, vendor)?
        .as_str()
        .ok_or_else(|| invalid_type_error(key, "string", vendor))
}

// get_opt_str is get_str for optional keys. A present key of the wrong
// type is still an error.
pub fn get_opt_str<'a, M: JsonMap>(
    map: &'a M,
    key: &str,
    vendor: MinerVendor,
) -> Result<Option<&'a str>, ConfigError> {
    get_opt_value(map, key)
        .map(|v| {
            v.as_str()
                .ok_or_else(|| invalid_type_error(key, "string", vendor))
        })
        .transpose()
}

// get_bool extracts a boolean value, returning appropriate errors
// if the key is missing or the value is not a boolean.
pub fn get_bool<M: JsonMap>(map: &M, key: &str, vendor: MinerVendor) -> Result<bool, ConfigError> {
    get_value(map, key, vendor)?
        .as_bool()
        .ok_or_else(|| invalid_type_error(key, "boolean", vendor))
}

// get_i64 extracts an integer value, returning appropriate errors
// if the key is missing or the value is not an integer.
pub fn get_i64<M: JsonMap>(map: &M, key: &str, vendor: MinerVendor) -> Result<i64, ConfigError> {
    get_value(map, key, vendor)?
        .as_i64()
        .ok_or_else(|| invalid_type_error(key, "integer", vendor))
}

pub fn get_opt_i64<M: JsonMap>(
    map: &M,
    key: &str,
    vendor: MinerVendor,
) -> Result<Option<i64>, ConfigError> {
    get_opt_value(map, key)
        .map(|v| {
            v.as_i64()
                .ok_or_else(|| invalid_type_error(key, "integer", vendor))
        })
        .transpose()
}

// get_opt_array extracts an optional array. Absent and null both map to None.
pub fn get_opt_array<'a, M: JsonMap>(
    map: &'a M,
    key: &str,
    vendor: MinerVendor,
) -> Result<Option<&'a Vec<serde_json::Value>>, ConfigError> {
    get_opt_value(map, key)
        .map(|v| {
            v.as_array()
                .ok_or_else(|| invalid_type_error(key, "array", vendor))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VENDOR: MinerVendor = MinerVendor::EspMiner;

    // test_get_str_success tests that get_str correctly extracts a string value.
    #[test]
    fn test_get_str_success() {
        let value = json!({
            "stratumURL": "public-pool.io",
            "stratumPort": 21496
        });
        let map = value.as_object().unwrap();

        let result = get_str(map, "stratumURL", VENDOR);
        assert_eq!(result.unwrap(), "public-pool.io");
    }

    // test_get_str_with_hashmap tests that get_str works with HashMap.
    #[test]
    fn test_get_str_with_hashmap() {
        let mut map: HashMap<String, serde_json::Value> = HashMap::new();
        map.insert("stratumUser".to_string(), json!("bc1q.worker"));

        let result = get_str(&map, "stratumUser", VENDOR);
        assert_eq!(result.unwrap(), "bc1q.worker");
    }

    // test_get_value_null_is_missing tests that an explicit null reads as a missing key.
    #[test]
    fn test_get_value_null_is_missing() {
        let value = json!({ "autofanspeed": null });
        let map = value.as_object().unwrap();

        let result = get_i64(map, "autofanspeed", VENDOR);
        assert!(matches!(result, Err(ConfigError::MissingKey { .. })));
        assert!(get_opt_value(map, "autofanspeed").is_none());
    }

    // test_get_i64_wrong_type tests that get_i64 returns InvalidKeyType when value is not an integer.
    #[test]
    fn test_get_i64_wrong_type() {
        let value = json!({ "fanspeed": "fast" });
        let map = value.as_object().unwrap();

        let result = get_i64(map, "fanspeed", VENDOR);
        assert!(matches!(result, Err(ConfigError::InvalidKeyType { .. })));
    }

    // test_get_opt_str tests absent, present and mistyped optional strings.
    #[test]
    fn test_get_opt_str() {
        let value = json!({ "stratumURL": "pool.example", "stratumUser": 7 });
        let map = value.as_object().unwrap();

        assert_eq!(
            get_opt_str(map, "stratumURL", VENDOR).unwrap(),
            Some("pool.example")
        );
        assert_eq!(get_opt_str(map, "stratumPassword", VENDOR).unwrap(), None);
        assert!(matches!(
            get_opt_str(map, "stratumUser", VENDOR),
            Err(ConfigError::InvalidKeyType { .. })
        ));
    }

    // test_get_bool_success tests that get_bool correctly extracts a boolean value.
    #[test]
    fn test_get_bool_success() {
        let value = json!({
            "bitmain-fan-ctrl": true,
            "bitmain-hashrate-percent": false
        });
        let map = value.as_object().unwrap();

        assert!(get_bool(map, "bitmain-fan-ctrl", VENDOR).unwrap());
        assert!(!get_bool(map, "bitmain-hashrate-percent", VENDOR).unwrap());
    }

    // test_get_opt_array tests that get_opt_array rejects non-array values.
    #[test]
    fn test_get_opt_array() {
        let value = json!({ "pools": [{"url": ""}], "bad": {} });
        let map = value.as_object().unwrap();

        assert_eq!(get_opt_array(map, "pools", VENDOR).unwrap().unwrap().len(), 1);
        assert!(get_opt_array(map, "missing", VENDOR).unwrap().is_none());
        assert!(get_opt_array(map, "bad", VENDOR).is_err());
    }
}
