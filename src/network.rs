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
use std::time::Duration;

use reqwest::{
    blocking::Client as HttpClient, blocking::ClientBuilder as HttpClientBuilder,
    header::HeaderValue, header::ACCEPT, header::CONTENT_TYPE, Method, StatusCode,
};
use serde::Serialize;
use tracing::debug;

use crate::model::{MinerVendor, WirePayload};
pub use crate::ConfigError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The JSON transport a device adapter talks through.
///
/// `api` is the path below the miner's web root, e.g. `api/system/info`.
pub trait MinerWeb: Send + Sync {
    fn get(&self, api: &str) -> Result<serde_json::Value, ConfigError>;

    fn patch(&self, api: &str, body: &WirePayload) -> Result<(), ConfigError>;

    fn post(&self, api: &str) -> Result<(), ConfigError>;
}

#[derive(Debug)]
pub struct MinerClientPoolBuilder {
    timeout: Duration,
}

impl MinerClientPoolBuilder {
    /// Overwrites the timeout that will be applied to every request
    pub fn timeout(mut self, timeout: Duration) -> MinerClientPoolBuilder {
        self.timeout = timeout;
        self
    }

    pub fn build(&self) -> Result<MinerClientPool, ConfigError> {
        let http_client = HttpClientBuilder::new()
            .timeout(self.timeout)
            .build()
            .map_err(ConfigError::ClientBuildError)?;
        Ok(MinerClientPool { http_client })
    }
}

/// The endpoint that the miner client connects to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoint {
    /// Hostname or IP address of the miner
    pub host: String,
    /// Web API port. If absent plain HTTP port 80 is used
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MinerClientPool {
    http_client: HttpClient,
}

impl MinerClientPool {
    pub fn builder() -> MinerClientPoolBuilder {
        MinerClientPoolBuilder {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates the device adapter for a miner whose vendor is already known.
    /// No request is made until the adapter is used.
    pub fn create_client(
        &self,
        endpoint: Endpoint,
        vendor: MinerVendor,
    ) -> Result<Box<dyn crate::Miner>, ConfigError> {
        let client = MinerHttpClient::new(self.http_client.clone(), endpoint);
        match vendor {
            MinerVendor::EspMiner => Ok(Box::new(crate::espminer::EspMiner::new(client))),
            // Stock Bitmain firmware wants digest auth on its cgi endpoints.
            MinerVendor::AntminerModern => Err(ConfigError::NotSupported(format!(
                "{vendor} web transport"
            ))),
        }
    }
}

/// A HTTP client which targets a single miner
pub struct MinerHttpClient {
    endpoint: Endpoint,
    http_client: HttpClient,
}

impl MinerHttpClient {
    pub fn new(http_client: HttpClient, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    fn url(&self, api: &str) -> String {
        match self.endpoint.port {
            Some(p) => format!("http://{}:{}/{}", self.endpoint.host, p, api),
            None => format!("http://{}/{}", self.endpoint.host, api),
        }
    }

    // All the HTTP requests happen from here. Returns the raw body; only
    // GET answers are JSON on every firmware, so decoding is left to the caller.
    pub fn req<B>(
        &self,
        method: Method,
        api: &str,
        body: Option<B>,
    ) -> Result<(StatusCode, String), ConfigError>
    where
        B: Serialize + ::std::fmt::Debug,
    {
        let url = self.url(api);
        let body_enc = match body {
            Some(b) => {
                let body_enc =
                    serde_json::to_string(&b).map_err(|e| ConfigError::JsonSerializeError {
                        url: url.clone(),
                        object_debug: format!("{b:?}"),
                        source: e,
                    })?;
                Some(body_enc)
            }
            None => None,
        };
        debug!(
            "TX {} {} {}",
            method,
            url,
            body_enc.as_deref().unwrap_or_default()
        );

        let mut req_b = match method {
            Method::GET => self.http_client.get(&url),
            Method::POST => self.http_client.post(&url),
            Method::PATCH => self.http_client.patch(&url),
            _ => unreachable!("Only GET, POST and PATCH http methods are used."),
        };
        req_b = req_b.header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(user) = &self.endpoint.user {
            req_b = req_b.basic_auth(user, self.endpoint.password.as_ref());
        }
        if let Some(b) = body_enc {
            req_b = req_b
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(b);
        }
        let response = req_b.send().map_err(|e| ConfigError::NetworkError {
            url: url.clone(),
            source: e,
        })?;
        let status_code = response.status();
        // read the body even if not status 2XX, firmware often explains itself in it
        let response_body = response.text().map_err(|e| ConfigError::NetworkError {
            url: url.clone(),
            source: e,
        })?;
        if response_body.is_empty() {
            debug!("RX {status_code}");
        } else {
            debug!("RX {status_code} {response_body}");
        }
        if !status_code.is_success() {
            return Err(ConfigError::HTTPErrorCode { url, status_code });
        }
        Ok((status_code, response_body))
    }
}

impl MinerWeb for MinerHttpClient {
    fn get(&self, api: &str) -> Result<serde_json::Value, ConfigError> {
        let (_status_code, body) = self.req::<()>(Method::GET, api, None)?;
        if body.is_empty() {
            return Err(ConfigError::NoContent);
        }
        serde_json::from_str(&body).map_err(|e| ConfigError::JsonDeserializeError {
            url: self.url(api),
            body,
            source: e,
        })
    }

    fn patch(&self, api: &str, body: &WirePayload) -> Result<(), ConfigError> {
        self.req(Method::PATCH, api, Some(body))
            .map(|_status_code| ())
    }

    fn post(&self, api: &str) -> Result<(), ConfigError> {
        self.req::<()>(Method::POST, api, None)
            .map(|_status_code| ())
    }
}
