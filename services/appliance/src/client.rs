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

use bytes::Bytes;
use http::Response;
use log::debug;
use sarest_core::{Context, Error, Result};
use serde::de::DeserializeOwned;

use crate::constants::MAX_ERROR_BODY_CHARS;
use crate::{
    ApplianceEndpoint, Config, Credential, FactorOperation, IpRiskRequest, Operation,
    PreparedRequest, RequestSigner,
};

/// Client sends signed calls to the appliance.
///
/// Requests are signed fresh for every call and handed to the context's
/// [`HttpSend`](sarest_core::HttpSend). Failures are never swallowed:
///
/// - building or signing the request fails with a request error,
/// - failing to reach the appliance is a transport error,
/// - a non-success status is a server rejection.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    endpoint: ApplianceEndpoint,
    signer: RequestSigner,
}

impl Client {
    /// Create a client.
    pub fn new(ctx: Context, endpoint: ApplianceEndpoint, credential: Credential) -> Self {
        Self {
            ctx,
            endpoint,
            signer: RequestSigner::new(credential),
        }
    }

    /// Create a client out of a config, usually loaded by [`Config::from_env`].
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        Ok(Self::new(ctx, config.endpoint()?, config.credential()?))
    }

    /// The endpoint requests go to.
    pub fn endpoint(&self) -> &ApplianceEndpoint {
        &self.endpoint
    }

    /// Build the signed request without sending it.
    pub fn prepare(&self, operation: &Operation) -> Result<PreparedRequest> {
        self.signer.prepare(&self.ctx, operation)
    }

    /// Sign and send an operation.
    pub async fn send(&self, operation: &Operation) -> Result<Response<Bytes>> {
        let prepared = self.prepare(operation)?;
        let req = prepared.to_http_request(&self.endpoint)?;

        let resp = self.ctx.http_send(req).await.map_err(|e| {
            if e.is_transport_error() {
                e
            } else {
                Error::transport_failed(format!(
                    "send {} {} failed",
                    prepared.method(),
                    prepared.path()
                ))
                .with_source(e)
            }
        })?;

        let status = resp.status();
        debug!(
            "appliance answered {} {} with {status}",
            prepared.method(),
            prepared.path()
        );
        if !status.is_success() {
            let body = truncate_body(resp.body());
            return Err(Error::server_rejected(format!(
                "appliance returned {status} for {} {}: {body}",
                prepared.method(),
                prepared.path()
            )));
        }

        Ok(resp)
    }

    /// Check that the user exists in the appliance datastore.
    pub async fn validate_user(&self, user_id: &str) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::validate_user_id(user_id)?)
            .await
    }

    /// Check the user's password.
    pub async fn validate_user_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::validate_password(user_id, password)?)
            .await
    }

    /// Check the answer to knowledge based question `factor_id`.
    pub async fn validate_kba(
        &self,
        user_id: &str,
        answer: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::validate_kba(user_id, answer, factor_id)?)
            .await
    }

    /// Check a passcode from OATH device `factor_id`.
    pub async fn validate_oath(
        &self,
        user_id: &str,
        otp: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::validate_oath(user_id, otp, factor_id)?)
            .await
    }

    /// Deliver a passcode by phone call.
    pub async fn deliver_otp_by_phone(
        &self,
        user_id: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::deliver_by_call(user_id, factor_id)?)
            .await
    }

    /// Deliver a passcode by SMS.
    pub async fn deliver_otp_by_sms(
        &self,
        user_id: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::deliver_by_sms(user_id, factor_id)?)
            .await
    }

    /// Deliver a passcode by email.
    pub async fn deliver_otp_by_email(
        &self,
        user_id: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::deliver_by_email(user_id, factor_id)?)
            .await
    }

    /// Send a push notification to device `factor_id`.
    pub async fn deliver_otp_by_push(
        &self,
        user_id: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::deliver_by_push(user_id, factor_id)?)
            .await
    }

    /// Have the help desk deliver a passcode.
    pub async fn deliver_otp_by_help_desk(
        &self,
        user_id: &str,
        factor_id: &str,
    ) -> Result<Response<Bytes>> {
        self.send_factor(FactorOperation::deliver_by_help_desk(user_id, factor_id)?)
            .await
    }

    /// List the factors available to the user.
    pub async fn factors_by_user(&self, user_id: &str) -> Result<Response<Bytes>> {
        self.send(&Operation::list_factors(user_id)?).await
    }

    /// Score the risk of the user connecting from `ip_address`.
    pub async fn ip_evaluation(&self, user_id: &str, ip_address: &str) -> Result<Response<Bytes>> {
        self.send(&Operation::from(IpRiskRequest::new(user_id, ip_address)?))
            .await
    }

    async fn send_factor(&self, op: FactorOperation) -> Result<Response<Bytes>> {
        self.send(&Operation::Factor(op)).await
    }
}

/// Keep error messages readable when a proxy answers with a full html page.
fn truncate_body(body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.into_owned(),
    }
}

/// Decode a JSON response body.
pub fn parse_json<T: DeserializeOwned>(resp: &Response<Bytes>) -> Result<T> {
    serde_json::from_slice(resp.body())
        .map_err(|e| Error::unexpected("decode appliance response failed").with_source(e))
}
