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
use reqwest::StatusCode;

use crate::model::MinerVendor;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Field {field} is not defined for {vendor}")]
    UnknownField { vendor: MinerVendor, field: String },

    #[error("{vendor} payload is not a JSON object")]
    NotAnObject { vendor: MinerVendor },

    #[error("Missing key {key} in {vendor} payload")]
    MissingKey { key: String, vendor: MinerVendor },

    #[error("Key {key} should be {expected_type} in {vendor} payload")]
    InvalidKeyType {
        key: String,
        expected_type: String,
        vendor: MinerVendor,
    },

    #[error("Key {key} has unsupported value {value} in {vendor} payload")]
    InvalidValue {
        key: String,
        value: String,
        vendor: MinerVendor,
    },

    #[error("Cannot serialize for {vendor}: attached extra config belongs to {attached}")]
    ExtraConfigMismatch {
        vendor: MinerVendor,
        attached: MinerVendor,
    },

    #[error("Could not build HTTP client. {0}")]
    ClientBuildError(#[source] reqwest::Error),

    #[error("Network error talking to miner at {url}. {source}")]
    NetworkError { url: String, source: reqwest::Error },

    #[error("HTTP {status_code} at {url}. See debug logs for details.")]
    HTTPErrorCode {
        url: String,
        status_code: StatusCode,
    },

    #[error("Could not deserialize response from {url}. Body: {body}. {source}")]
    JsonDeserializeError {
        url: String,
        body: String,
        source: serde_json::Error,
    },

    #[error("Could not serialize request body for {url}. Obj: {object_debug}. {source}")]
    JsonSerializeError {
        url: String,
        object_debug: String,
        source: serde_json::Error,
    },

    #[error("Remote returned empty body")]
    NoContent,

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl ConfigError {
    /// True for the errors raised while parsing the base fields of a vendor payload.
    /// Adapters surface these unchanged; no partial config is ever returned with them.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(
            self,
            ConfigError::NotAnObject { .. }
                | ConfigError::MissingKey { .. }
                | ConfigError::InvalidKeyType { .. }
                | ConfigError::InvalidValue { .. }
        )
    }
}
