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

use std::fmt::{Debug, Formatter};

use sarest_core::utils::Redact;
use sarest_core::{Context, Error, Result};

use crate::constants::*;
use crate::{ApplianceEndpoint, Credential};

/// Config carries all the configuration for talking to an appliance.
#[derive(Clone, Default)]
pub struct Config {
    /// `host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_HOST`]
    pub host: Option<String>,
    /// `port` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_PORT`]
    /// - default to `443`
    pub port: Option<u16>,
    /// `ssl` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_SSL`]
    /// - default to `true`
    pub ssl: Option<bool>,
    /// `realm` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_REALM`]
    pub realm: Option<String>,
    /// `application_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_APPLICATION_ID`]
    pub application_id: Option<String>,
    /// `application_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SAREST_APPLICATION_KEY`]
    pub application_key: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set ssl
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = Some(ssl);
        self
    }

    /// Set realm
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Set application_id
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// Set application_key
    pub fn with_application_key(mut self, application_key: impl Into<String>) -> Self {
        self.application_key = Some(application_key.into());
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(SAREST_HOST) {
            self.host.get_or_insert(v);
        }
        if self.port.is_none() {
            if let Some(v) = ctx.env_var(SAREST_PORT) {
                let port = v.trim().parse::<u16>().map_err(|e| {
                    Error::config_invalid(format!("{SAREST_PORT} {v:?} is not a valid port"))
                        .with_source(e)
                })?;
                self.port = Some(port);
            }
        }
        if self.ssl.is_none() {
            if let Some(v) = ctx.env_var(SAREST_SSL) {
                self.ssl = Some(parse_bool(SAREST_SSL, &v)?);
            }
        }
        if let Some(v) = ctx.env_var(SAREST_REALM) {
            self.realm.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SAREST_APPLICATION_ID) {
            self.application_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SAREST_APPLICATION_KEY) {
            self.application_key.get_or_insert(v);
        }

        Ok(self)
    }

    /// Build the credential out of this config.
    pub fn credential(&self) -> Result<Credential> {
        let application_id = self
            .application_id
            .as_deref()
            .ok_or_else(|| Error::config_invalid("application id is required"))?;
        let application_key = self
            .application_key
            .as_deref()
            .ok_or_else(|| Error::config_invalid("application key is required"))?;
        let realm = self
            .realm
            .as_deref()
            .ok_or_else(|| Error::config_invalid("realm is required"))?;

        Credential::new(application_id, application_key, realm)
    }

    /// Build the appliance endpoint out of this config.
    pub fn endpoint(&self) -> Result<ApplianceEndpoint> {
        let host = self
            .host
            .as_deref()
            .ok_or_else(|| Error::config_invalid("appliance host is required"))?;

        ApplianceEndpoint::new(
            host,
            self.port.unwrap_or(DEFAULT_PORT),
            self.ssl.unwrap_or(true),
        )
    }
}

fn parse_bool(key: &str, v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(Error::config_invalid(format!(
            "{key} {v:?} is not a valid boolean"
        ))),
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ssl", &self.ssl)
            .field("realm", &self.realm)
            .field(
                "application_id",
                &self.application_id.as_ref().map(Redact::from),
            )
            .field(
                "application_key",
                &self.application_key.as_ref().map(Redact::from),
            )
            .finish()
    }
}
