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

use crate::jsonmap::{self, invalid_type_error};
use crate::model::{MinerVendor, WirePayload};
use crate::ConfigError;

const DEFAULT_SCHEME: &str = "stratum+tcp";

// AxeOS only stores a primary and a fallback pool.
const ESPMINER_MAX_POOLS: usize = 2;
// Bitmain's web UI always carries exactly three pool slots.
const AM_MODERN_POOL_SLOTS: usize = 3;

/// One stratum endpoint. `url` is kept in `scheme://host:port` form; `new`
/// puts `stratum+tcp://` in front of a bare host.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl Pool {
    pub fn new(url: &str, user: &str, password: &str) -> Self {
        let url = if url.is_empty() || url.contains("://") {
            url.to_string()
        } else {
            format!("{DEFAULT_SCHEME}://{url}")
        };
        Pool {
            url,
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    /// Host and optional port, with any `scheme://` prefix removed.
    pub fn host_and_port(&self) -> (&str, Option<u16>) {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        split_port(rest)
    }

    // AxeOS takes a bare host for plain stratum. Any other scheme stays on the host.
    fn espminer_host_and_port(&self) -> (&str, Option<u16>) {
        let rest = self
            .url
            .strip_prefix(DEFAULT_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .unwrap_or(&self.url);
        split_port(rest)
    }

    fn url_from_parts(host: &str, port: Option<u16>) -> String {
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("{DEFAULT_SCHEME}://{host}")
        };
        match port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        }
    }
}

fn split_port(rest: &str) -> (&str, Option<u16>) {
    let rest = rest.trim_end_matches('/');
    match rest.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, Some(port)),
            Err(_) => (rest, None),
        },
        None => (rest, None),
    }
}

/// Ordered pool list. The first pool is the primary, the rest are failovers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub pools: Vec<Pool>,
}

// Primary then fallback key sets, in the order AxeOS documents them.
const ESPMINER_POOL_SLOTS: [EspMinerPoolKeys; ESPMINER_MAX_POOLS] = [
    EspMinerPoolKeys {
        url: "stratumURL",
        port: "stratumPort",
        user: "stratumUser",
        password: "stratumPassword",
    },
    EspMinerPoolKeys {
        url: "fallbackStratumURL",
        port: "fallbackStratumPort",
        user: "fallbackStratumUser",
        password: "fallbackStratumPassword",
    },
];

struct EspMinerPoolKeys {
    url: &'static str,
    port: &'static str,
    user: &'static str,
    password: &'static str,
}

impl PoolConfig {
    pub const ESPMINER_KEYS: [&'static str; 8] = [
        "stratumURL",
        "stratumPort",
        "stratumUser",
        "stratumPassword",
        "fallbackStratumURL",
        "fallbackStratumPort",
        "fallbackStratumUser",
        "fallbackStratumPassword",
    ];

    pub const AM_MODERN_KEYS: [&'static str; 1] = ["pools"];

    pub fn simple(pools: impl IntoIterator<Item = Pool>) -> Self {
        PoolConfig {
            pools: pools.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn as_espminer(&self) -> WirePayload {
        if self.pools.len() > ESPMINER_MAX_POOLS {
            debug!(
                "ESPMiner holds {} pools, dropping {} extra",
                ESPMINER_MAX_POOLS,
                self.pools.len() - ESPMINER_MAX_POOLS
            );
        }
        let mut payload = WirePayload::new();
        for (pool, keys) in self.pools.iter().zip(ESPMINER_POOL_SLOTS.iter()) {
            let (host, port) = pool.espminer_host_and_port();
            payload.insert(keys.url.to_string(), host.into());
            if let Some(port) = port {
                payload.insert(keys.port.to_string(), port.into());
            }
            payload.insert(keys.user.to_string(), pool.user.as_str().into());
            // An empty password would overwrite the stored one, which GET never returns
            if !pool.password.is_empty() {
                payload.insert(keys.password.to_string(), pool.password.as_str().into());
            }
        }
        payload
    }

    pub fn from_espminer(payload: &WirePayload) -> Result<Self, ConfigError> {
        let vendor = MinerVendor::EspMiner;
        let mut pools = Vec::new();
        for keys in ESPMINER_POOL_SLOTS.iter() {
            let host = match jsonmap::get_opt_str(payload, keys.url, vendor)? {
                Some(host) if !host.is_empty() => host,
                _ => continue,
            };
            let port = jsonmap::get_opt_i64(payload, keys.port, vendor)?
                .map(|port| {
                    u16::try_from(port).map_err(|_| ConfigError::InvalidValue {
                        key: keys.port.to_string(),
                        value: port.to_string(),
                        vendor,
                    })
                })
                .transpose()?;
            // AxeOS does not echo the password back on GET
            let user = jsonmap::get_opt_str(payload, keys.user, vendor)?.unwrap_or_default();
            let password =
                jsonmap::get_opt_str(payload, keys.password, vendor)?.unwrap_or_default();
            pools.push(Pool {
                url: Pool::url_from_parts(host, port),
                user: user.to_string(),
                password: password.to_string(),
            });
        }
        Ok(PoolConfig { pools })
    }

    pub fn as_am_modern(&self) -> WirePayload {
        if self.pools.len() > AM_MODERN_POOL_SLOTS {
            debug!(
                "Antminer holds {} pools, dropping {} extra",
                AM_MODERN_POOL_SLOTS,
                self.pools.len() - AM_MODERN_POOL_SLOTS
            );
        }
        let empty = Pool::default();
        let pools: Vec<serde_json::Value> = self
            .pools
            .iter()
            .chain(std::iter::repeat(&empty))
            .take(AM_MODERN_POOL_SLOTS)
            .map(|pool| {
                serde_json::json!({
                    "url": pool.url,
                    "user": pool.user,
                    "pass": pool.password,
                })
            })
            .collect();
        let mut payload = WirePayload::new();
        payload.insert("pools".to_string(), pools.into());
        payload
    }

    pub fn from_am_modern(payload: &WirePayload) -> Result<Self, ConfigError> {
        let vendor = MinerVendor::AntminerModern;
        let Some(entries) = jsonmap::get_opt_array(payload, "pools", vendor)? else {
            return Ok(PoolConfig::default());
        };
        let mut pools = Vec::new();
        for entry in entries {
            let entry = entry
                .as_object()
                .ok_or_else(|| invalid_type_error("pools", "array of objects", vendor))?;
            let url = jsonmap::get_str(entry, "url", vendor)?;
            if url.is_empty() {
                continue;
            }
            let user = jsonmap::get_opt_str(entry, "user", vendor)?.unwrap_or_default();
            let password = jsonmap::get_opt_str(entry, "pass", vendor)?.unwrap_or_default();
            pools.push(Pool::new(url, user, password));
        }
        Ok(PoolConfig { pools })
    }
}
