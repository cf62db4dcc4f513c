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

use std::fmt::{Debug, Formatter, Write};

use http::Method;
use sarest_core::{Error, Result};

use crate::constants::CANONICAL_DELIMITER;

/// CanonicalRequest is the exact text the appliance rebuilds and compares
/// the signature against.
///
/// ## Format
///
/// ```text
/// METHOD + "\n" +
/// PATH + "\n" +
/// PAYLOAD + "\n" +
/// DATE
/// ```
///
/// `PAYLOAD` is empty for bodiless calls and `DATE` is the value of the
/// `Date` header.
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalRequest(String);

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// A missing payload and an empty payload produce the same text.
    pub fn build(
        method: &Method,
        path: &str,
        payload: Option<&str>,
        timestamp: &str,
    ) -> Result<Self> {
        if *method != Method::GET && *method != Method::POST {
            return Err(Error::request_invalid(format!(
                "method {method} is not used by the appliance api"
            )));
        }
        if !path.starts_with('/') {
            return Err(Error::request_invalid(format!(
                "path {path:?} must be absolute"
            )));
        }
        if path.contains(CANONICAL_DELIMITER) || timestamp.contains(CANONICAL_DELIMITER) {
            return Err(Error::request_invalid(
                "path and timestamp must not contain line breaks",
            ));
        }
        if timestamp.is_empty() {
            return Err(Error::request_invalid("timestamp must not be empty"));
        }

        let payload = payload.unwrap_or_default();

        let mut s = String::with_capacity(
            method.as_str().len() + path.len() + payload.len() + timestamp.len() + 3,
        );
        s.write_str(method.as_str())?;
        s.write_char(CANONICAL_DELIMITER)?;
        s.write_str(path)?;
        s.write_char(CANONICAL_DELIMITER)?;
        s.write_str(payload)?;
        s.write_char(CANONICAL_DELIMITER)?;
        s.write_str(timestamp)?;

        Ok(Self(s))
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bytes that get signed.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

// The payload may carry a password, only the line before it is printed.
impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let head = self.0.split(CANONICAL_DELIMITER).take(2).collect::<Vec<_>>();
        f.debug_struct("CanonicalRequest")
            .field("head", &head.join(" "))
            .field("len", &self.0.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sarest_core::ErrorKind;

    const TS: &str = "Tue, 03 Jun 2025 14:00:00 GMT";

    #[test]
    fn test_build_post() {
        let c = CanonicalRequest::build(
            &Method::POST,
            "/secureauth1/api/v1/auth",
            Some(r#"{"type":"password","user_id":"jdoe","token":"hunter2"}"#),
            TS,
        )
        .unwrap();

        assert_eq!(
            c.as_str(),
            "POST\n/secureauth1/api/v1/auth\n{\"type\":\"password\",\"user_id\":\"jdoe\",\"token\":\"hunter2\"}\nTue, 03 Jun 2025 14:00:00 GMT"
        );
    }

    #[test]
    fn test_build_get() {
        let c = CanonicalRequest::build(
            &Method::GET,
            "/secureauth1/api/v1/users/jdoe/factors",
            None,
            TS,
        )
        .unwrap();

        assert_eq!(
            c.as_str(),
            "GET\n/secureauth1/api/v1/users/jdoe/factors\n\nTue, 03 Jun 2025 14:00:00 GMT"
        );
    }

    #[test]
    fn test_empty_payload_equals_absent_payload() {
        let path = "/secureauth1/api/v1/users/jdoe/factors";
        let absent = CanonicalRequest::build(&Method::GET, path, None, TS).unwrap();
        let empty = CanonicalRequest::build(&Method::GET, path, Some(""), TS).unwrap();
        assert_eq!(absent, empty);
        assert_eq!(absent.as_bytes(), empty.as_bytes());
    }

    #[test]
    fn test_build_is_stable() {
        let build = || {
            CanonicalRequest::build(&Method::POST, "/r/api/v1/ipeval", Some("{}"), TS).unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_build_rejects_invalid_input() {
        let cases = vec![
            CanonicalRequest::build(&Method::PUT, "/r/api/v1/auth", None, TS),
            CanonicalRequest::build(&Method::DELETE, "/r/api/v1/auth", None, TS),
            CanonicalRequest::build(&Method::POST, "r/api/v1/auth", None, TS),
            CanonicalRequest::build(&Method::POST, "/r/api\n/v1/auth", None, TS),
            CanonicalRequest::build(&Method::POST, "/r/api/v1/auth", None, ""),
        ];
        for case in cases {
            assert_eq!(case.unwrap_err().kind(), ErrorKind::RequestInvalid);
        }
    }

    #[test]
    fn test_debug_hides_payload() {
        let c = CanonicalRequest::build(
            &Method::POST,
            "/secureauth1/api/v1/auth",
            Some(r#"{"type":"password","user_id":"jdoe","token":"hunter2"}"#),
            TS,
        )
        .unwrap();
        let s = format!("{c:?}");
        assert!(!s.contains("hunter2"));
        assert!(s.contains("POST /secureauth1/api/v1/auth"));
    }
}
