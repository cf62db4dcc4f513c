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

// Env values used by the appliance config.
pub const SAREST_HOST: &str = "SAREST_HOST";
pub const SAREST_PORT: &str = "SAREST_PORT";
pub const SAREST_SSL: &str = "SAREST_SSL";
pub const SAREST_REALM: &str = "SAREST_REALM";
pub const SAREST_APPLICATION_ID: &str = "SAREST_APPLICATION_ID";
pub const SAREST_APPLICATION_KEY: &str = "SAREST_APPLICATION_KEY";

pub const DEFAULT_PORT: u16 = 443;

/// Scheme prefix of the authorization header value.
pub const AUTHORIZATION_SCHEME: &str = "SA-HMAC-SHA256";

/// Separates the fields of the canonical request.
pub const CANONICAL_DELIMITER: char = '\n';

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const API_VERSION: &str = "api/v1";

/// Longest response body quoted in a rejection error.
pub const MAX_ERROR_BODY_CHARS: usize = 256;
