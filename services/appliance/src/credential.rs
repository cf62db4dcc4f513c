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
use sarest_core::{Error, Result};

use crate::route;

/// Credential holds the long-lived secrets of one application on the appliance.
///
/// A credential is validated once on construction and can not be changed
/// afterwards. Share it by reference (or behind an `Arc`) across calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    application_id: String,
    application_key: String,
    realm: String,
}

impl Credential {
    /// Create a new credential.
    ///
    /// Fails with a config invalid error if any field is empty, or if the
    /// application id or the realm contains a character that would break the
    /// authorization header or the request path.
    pub fn new(
        application_id: impl Into<String>,
        application_key: impl Into<String>,
        realm: impl Into<String>,
    ) -> Result<Self> {
        let application_id = application_id.into();
        let application_key = application_key.into();
        let realm = realm.into();

        if application_id.is_empty() {
            return Err(Error::config_invalid("application id must not be empty"));
        }
        if application_key.is_empty() {
            return Err(Error::config_invalid("application key must not be empty"));
        }
        if realm.is_empty() {
            return Err(Error::config_invalid("realm must not be empty"));
        }
        if !application_id
            .chars()
            .all(|c| c.is_ascii_graphic() && c != ':')
        {
            return Err(Error::config_invalid(
                "application id must be visible ascii without ':'",
            ));
        }
        // The realm is signed as a raw path segment, so it must never need encoding.
        if !realm.chars().all(route::is_unreserved) {
            return Err(Error::config_invalid(format!(
                "realm {realm:?} is not a valid path segment"
            )));
        }

        Ok(Self {
            application_id,
            application_key,
            realm,
        })
    }

    /// The application id.
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// The application key, only ever used as the signing secret.
    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    /// The realm the application is configured in.
    pub fn realm(&self) -> &str {
        &self.realm
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("application_id", &Redact::from(&self.application_id))
            .field("application_key", &Redact::from(&self.application_key))
            .field("realm", &self.realm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarest_core::ErrorKind;
    use test_case::test_case;

    #[test]
    fn test_credential() {
        let cred = Credential::new("app-1234", "0123456789abcdef0123", "secureauth1").unwrap();
        assert_eq!(cred.application_id(), "app-1234");
        assert_eq!(cred.application_key(), "0123456789abcdef0123");
        assert_eq!(cred.realm(), "secureauth1");
    }

    #[test_case("", "key", "realm"; "empty id")]
    #[test_case("id", "", "realm"; "empty key")]
    #[test_case("id", "key", ""; "empty realm")]
    #[test_case("app:1", "key", "realm"; "colon in id")]
    #[test_case("app 1", "key", "realm"; "space in id")]
    #[test_case("id", "key", "secure:auth"; "colon in realm")]
    #[test_case("id", "key", "secure/auth"; "slash in realm")]
    #[test_case("id", "key", "sec#ure"; "fragment in realm")]
    #[test_case("id", "key", "sec%2Fure"; "percent in realm")]
    #[test_case("id", "key", "réalm"; "non ascii realm")]
    #[test_case("id", "key", "realm\u{7f}"; "control char in realm")]
    #[test_case("app\u{7f}1", "key", "realm"; "control char in id")]
    #[test_case("app\tid", "key", "realm"; "tab in id")]
    #[test_case("appé", "key", "realm"; "non ascii id")]
    fn test_credential_invalid(id: &str, key: &str, realm: &str) {
        let err = Credential::new(id, key, realm).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_credential_accepts_unreserved_realm() {
        let cred = Credential::new("app_1234.v2", "key", "Secure-Auth_1.0~x").unwrap();
        assert_eq!(cred.realm(), "Secure-Auth_1.0~x");
    }

    #[test]
    fn test_debug_redacts_key() {
        let cred = Credential::new("app-1234", "0123456789abcdef0123", "secureauth1").unwrap();
        let s = format!("{cred:?}");
        assert!(!s.contains("0123456789abcdef0123"));
        assert!(s.contains("012***123"));
        assert!(s.contains("secureauth1"));
    }
}
