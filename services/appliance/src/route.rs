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

//! REST routes of the appliance.
//!
//! Every route lives under the realm the application is configured in.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::constants::API_VERSION;

/// Characters kept verbatim in a path segment, as RFC 3986 unreserved.
static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Whether `c` is kept verbatim in a path segment.
pub(crate) fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// `/{realm}/api/v1/auth`, shared by every validation and delivery.
pub fn auth(realm: &str) -> String {
    format!("/{realm}/{API_VERSION}/auth")
}

/// `/{realm}/api/v1/users/{user_id}/factors`
pub fn factors(realm: &str, user_id: &str) -> String {
    format!(
        "/{realm}/{API_VERSION}/users/{}/factors",
        utf8_percent_encode(user_id, &PATH_SEGMENT_ENCODE_SET)
    )
}

/// `/{realm}/api/v1/ipeval`
pub fn ip_eval(realm: &str) -> String {
    format!("/{realm}/{API_VERSION}/ipeval")
}
