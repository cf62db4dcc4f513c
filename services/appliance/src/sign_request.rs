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

//! Identity appliance request signing.

use std::fmt::{Debug, Formatter};

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use http::{HeaderValue, Method};
use log::debug;
use sarest_core::hash::base64_hmac_sha256;
use sarest_core::time::{format_http_date, DateTime, TimeSource};
use sarest_core::{Context, Error, ErrorKind, Result};

use crate::constants::*;
use crate::{ApplianceEndpoint, CanonicalRequest, Credential, Operation};

/// Sign the canonical request with the application key.
///
/// Returns the base64 encoded HMAC-SHA256 digest.
pub fn sign(canonical: &CanonicalRequest, application_key: &str) -> String {
    base64_hmac_sha256(application_key.as_bytes(), canonical.as_bytes())
}

/// Render the authorization header value:
///
/// ```text
/// SA-HMAC-SHA256 {application_id}:{realm}:{signature}
/// ```
pub fn format_header(application_id: &str, realm: &str, signature: &str) -> String {
    format!("{AUTHORIZATION_SCHEME} {application_id}:{realm}:{signature}")
}

/// Build a signed request for `operation`.
///
/// The signing time is taken from `time` on every call and ends up both in
/// the signature and in [`PreparedRequest::date`].
pub fn prepare(
    operation: &Operation,
    credential: &Credential,
    time: &dyn TimeSource,
) -> Result<PreparedRequest> {
    prepare_with(operation, credential, || time.now())
}

fn prepare_with(
    operation: &Operation,
    credential: &Credential,
    now: impl FnOnce() -> Result<DateTime>,
) -> Result<PreparedRequest> {
    operation.validate()?;

    let now = now().map_err(|e| {
        if e.kind() == ErrorKind::ClockUnavailable {
            e
        } else {
            Error::clock_unavailable("time source failed to provide signing time").with_source(e)
        }
    })?;
    let date = format_http_date(now);

    let method = operation.method();
    let path = operation.path(credential.realm());
    let body = operation.payload()?;

    let canonical = CanonicalRequest::build(&method, &path, Some(&body), &date)?;
    let signature = sign(&canonical, credential.application_key());
    debug!("signed request: {method} {path} at {date}");

    Ok(PreparedRequest {
        authorization: format_header(credential.application_id(), credential.realm(), &signature),
        method,
        path,
        body,
        date,
    })
}

/// RequestSigner signs operations with one credential.
///
/// The signer holds no mutable state and can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: Credential,
}

impl RequestSigner {
    /// Create a signer for the credential.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// The credential requests are signed with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Build a signed request for `operation` at the time of the context's
    /// time source.
    pub fn prepare(&self, ctx: &Context, operation: &Operation) -> Result<PreparedRequest> {
        prepare_with(operation, &self.credential, || ctx.now())
    }
}

/// PreparedRequest is everything the transport needs to send a signed call.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    method: Method,
    path: String,
    body: String,
    date: String,
    authorization: String,
}

impl PreparedRequest {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved request path, including the realm.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Serialized JSON body, empty for GET.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Value of the `Date` header, identical to the date that was signed.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Convert into an `http::Request` against `endpoint`.
    pub fn to_http_request(&self, endpoint: &ApplianceEndpoint) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method.clone())
            .uri(endpoint.url(&self.path))
            .header(DATE, HeaderValue::from_str(&self.date)?)
            .header(AUTHORIZATION, {
                let mut value = HeaderValue::from_str(&self.authorization)?;
                value.set_sensitive(true);

                value
            })
            .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

        if self.method == Method::POST {
            req = req.header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        }

        Ok(req.body(Bytes::from(self.body.clone()))?)
    }
}

impl Debug for PreparedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body_len", &self.body.len())
            .field("date", &self.date)
            .field("authorization", &self.authorization)
            .finish()
    }
}
