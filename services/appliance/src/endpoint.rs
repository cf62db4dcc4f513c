// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use sarest_core::{Error, Result};

/// ApplianceEndpoint locates the appliance serving the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplianceEndpoint {
    host: String,
    port: u16,
    ssl: bool,
}

impl ApplianceEndpoint {
    /// Create an endpoint from the appliance FQDN, the port of its web
    /// application and whether to talk https.
    pub fn new(host: impl Into<String>, port: u16, ssl: bool) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::config_invalid("appliance host must not be empty"));
        }
        if host.contains("://") || host.contains('/') {
            return Err(Error::config_invalid(format!(
                "appliance host {host:?} must be a bare host name"
            )));
        }
        if port == 0 {
            return Err(Error::config_invalid("appliance port must not be 0"));
        }

        Ok(Self { host, port, ssl })
    }

    /// The appliance host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The appliance port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether requests go over https.
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    /// Base url like `https://idp.example.com:443`.
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Full url of an already resolved request path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}
