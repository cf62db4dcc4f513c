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

//! Operations the appliance can be asked to perform.

use std::fmt::{Debug, Formatter};

use http::Method;
use sarest_core::utils::Redact;
use sarest_core::{Error, Result};
use serde::Serialize;

use crate::route;

/// FactorOperation is one authentication or one-time-passcode delivery request.
///
/// Each variant carries exactly the fields the appliance expects for it and
/// serializes to a flat object with a `type` discriminator:
///
/// ```text
/// {"type":"kba","user_id":"jdoe","token":"blue","factor_id":"Question1"}
/// ```
///
/// Prefer the constructors which reject empty fields; [`FactorOperation::validate`]
/// runs the same checks for values built from the variants directly.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FactorOperation {
    /// Check that the user exists in the appliance datastore.
    #[serde(rename = "user_id")]
    ValidateUserId { user_id: String },
    /// Check the user's password.
    #[serde(rename = "password")]
    ValidatePassword { user_id: String, token: String },
    /// Check the answer to a knowledge based question.
    #[serde(rename = "kba")]
    ValidateKba {
        user_id: String,
        token: String,
        factor_id: String,
    },
    /// Check a passcode produced by an OATH device.
    #[serde(rename = "oath")]
    ValidateOath {
        user_id: String,
        token: String,
        factor_id: String,
    },
    /// Deliver a passcode by phone call, `factor_id` is like `Phone1`.
    #[serde(rename = "call")]
    DeliverByCall { user_id: String, factor_id: String },
    /// Deliver a passcode by SMS, `factor_id` is like `Phone1`.
    #[serde(rename = "sms")]
    DeliverBySms { user_id: String, factor_id: String },
    /// Deliver a passcode by email, `factor_id` is like `Email1`.
    #[serde(rename = "email")]
    DeliverByEmail { user_id: String, factor_id: String },
    /// Send a push notification to an enrolled device.
    #[serde(rename = "push")]
    DeliverByPush { user_id: String, factor_id: String },
    /// Have the passcode delivered by the help desk, `factor_id` is like `HelpDesk1`.
    #[serde(rename = "help_desk")]
    DeliverByHelpDesk { user_id: String, factor_id: String },
}

impl FactorOperation {
    /// Build a user id check.
    pub fn validate_user_id(user_id: impl Into<String>) -> Result<Self> {
        Self::ValidateUserId {
            user_id: user_id.into(),
        }
        .validated()
    }

    /// Build a password check.
    pub fn validate_password(user_id: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::ValidatePassword {
            user_id: user_id.into(),
            token: password.into(),
        }
        .validated()
    }

    /// Build a knowledge based answer check against question `factor_id`.
    pub fn validate_kba(
        user_id: impl Into<String>,
        answer: impl Into<String>,
        factor_id: impl Into<String>,
    ) -> Result<Self> {
        Self::ValidateKba {
            user_id: user_id.into(),
            token: answer.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build an OATH passcode check for device `factor_id`.
    pub fn validate_oath(
        user_id: impl Into<String>,
        otp: impl Into<String>,
        factor_id: impl Into<String>,
    ) -> Result<Self> {
        Self::ValidateOath {
            user_id: user_id.into(),
            token: otp.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build a passcode delivery by phone call.
    pub fn deliver_by_call(user_id: impl Into<String>, factor_id: impl Into<String>) -> Result<Self> {
        Self::DeliverByCall {
            user_id: user_id.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build a passcode delivery by SMS.
    pub fn deliver_by_sms(user_id: impl Into<String>, factor_id: impl Into<String>) -> Result<Self> {
        Self::DeliverBySms {
            user_id: user_id.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build a passcode delivery by email.
    pub fn deliver_by_email(user_id: impl Into<String>, factor_id: impl Into<String>) -> Result<Self> {
        Self::DeliverByEmail {
            user_id: user_id.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build a push notification.
    pub fn deliver_by_push(user_id: impl Into<String>, factor_id: impl Into<String>) -> Result<Self> {
        Self::DeliverByPush {
            user_id: user_id.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// Build a passcode delivery through the help desk.
    pub fn deliver_by_help_desk(
        user_id: impl Into<String>,
        factor_id: impl Into<String>,
    ) -> Result<Self> {
        Self::DeliverByHelpDesk {
            user_id: user_id.into(),
            factor_id: factor_id.into(),
        }
        .validated()
    }

    /// The `type` discriminator sent to the appliance.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidateUserId { .. } => "user_id",
            Self::ValidatePassword { .. } => "password",
            Self::ValidateKba { .. } => "kba",
            Self::ValidateOath { .. } => "oath",
            Self::DeliverByCall { .. } => "call",
            Self::DeliverBySms { .. } => "sms",
            Self::DeliverByEmail { .. } => "email",
            Self::DeliverByPush { .. } => "push",
            Self::DeliverByHelpDesk { .. } => "help_desk",
        }
    }

    /// The user the operation is about.
    pub fn user_id(&self) -> &str {
        match self {
            Self::ValidateUserId { user_id }
            | Self::ValidatePassword { user_id, .. }
            | Self::ValidateKba { user_id, .. }
            | Self::ValidateOath { user_id, .. }
            | Self::DeliverByCall { user_id, .. }
            | Self::DeliverBySms { user_id, .. }
            | Self::DeliverByEmail { user_id, .. }
            | Self::DeliverByPush { user_id, .. }
            | Self::DeliverByHelpDesk { user_id, .. } => user_id,
        }
    }

    /// The secret the user presented, if the variant carries one.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::ValidatePassword { token, .. }
            | Self::ValidateKba { token, .. }
            | Self::ValidateOath { token, .. } => Some(token),
            _ => None,
        }
    }

    /// The factor the operation targets, if the variant carries one.
    pub fn factor_id(&self) -> Option<&str> {
        match self {
            Self::ValidateUserId { .. } | Self::ValidatePassword { .. } => None,
            Self::ValidateKba { factor_id, .. }
            | Self::ValidateOath { factor_id, .. }
            | Self::DeliverByCall { factor_id, .. }
            | Self::DeliverBySms { factor_id, .. }
            | Self::DeliverByEmail { factor_id, .. }
            | Self::DeliverByPush { factor_id, .. }
            | Self::DeliverByHelpDesk { factor_id, .. } => Some(factor_id),
        }
    }

    /// Check that every field the variant carries is populated.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        require(kind, "user_id", self.user_id())?;
        if let Some(token) = self.token() {
            require(kind, "token", token)?;
        }
        if let Some(factor_id) = self.factor_id() {
            require(kind, "factor_id", factor_id)?;
        }
        Ok(())
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

impl Debug for FactorOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("FactorOperation");
        d.field("type", &self.kind());
        d.field("user_id", &self.user_id());
        if let Some(token) = self.token() {
            d.field("token", &Redact::from(token));
        }
        if let Some(factor_id) = self.factor_id() {
            d.field("factor_id", &factor_id);
        }
        d.finish()
    }
}

/// IpRiskRequest asks the appliance to score the risk of a user signing in
/// from an ip address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "risk")]
pub struct IpRiskRequest {
    user_id: String,
    ip_address: String,
}

impl IpRiskRequest {
    /// Create a new ip risk request.
    pub fn new(user_id: impl Into<String>, ip_address: impl Into<String>) -> Result<Self> {
        let req = Self {
            user_id: user_id.into(),
            ip_address: ip_address.into(),
        };
        require("risk", "user_id", &req.user_id)?;
        require("risk", "ip_address", &req.ip_address)?;
        Ok(req)
    }

    /// The user the evaluation is about.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The ip address the user connects from.
    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }
}

fn require(kind: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::request_invalid(format!(
            "{kind} operation requires a non-empty {field}"
        )));
    }
    Ok(())
}

/// Operation is everything a signed call can ask the appliance for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Validate a user or deliver a passcode.
    Factor(FactorOperation),
    /// Score the risk of an ip address.
    IpRisk(IpRiskRequest),
    /// List the factors available to a user.
    ListFactors {
        /// The user whose factors are listed.
        user_id: String,
    },
}

impl Operation {
    /// Build a factor listing for `user_id`.
    pub fn list_factors(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        require("factors", "user_id", &user_id)?;
        Ok(Self::ListFactors { user_id })
    }

    /// HTTP method of the call.
    pub fn method(&self) -> Method {
        match self {
            Self::ListFactors { .. } => Method::GET,
            Self::Factor(_) | Self::IpRisk(_) => Method::POST,
        }
    }

    /// Resolve the request path under `realm`.
    pub fn path(&self, realm: &str) -> String {
        match self {
            Self::Factor(_) => route::auth(realm),
            Self::IpRisk(_) => route::ip_eval(realm),
            Self::ListFactors { user_id } => route::factors(realm, user_id),
        }
    }

    /// Serialize the request body, empty for bodiless calls.
    pub fn payload(&self) -> Result<String> {
        let payload = match self {
            Self::Factor(op) => serde_json::to_string(op),
            Self::IpRisk(req) => serde_json::to_string(req),
            Self::ListFactors { .. } => return Ok(String::new()),
        };

        payload.map_err(|e| Error::unexpected("serialize request payload failed").with_source(e))
    }

    /// Re-check the fields of the operation.
    ///
    /// Variants can be built without the validating constructors, so the
    /// signing path runs this before anything is signed.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Factor(op) => op.validate(),
            Self::IpRisk(req) => {
                require("risk", "user_id", &req.user_id)?;
                require("risk", "ip_address", &req.ip_address)
            }
            Self::ListFactors { user_id } => require("factors", "user_id", user_id),
        }
    }
}

impl From<FactorOperation> for Operation {
    fn from(op: FactorOperation) -> Self {
        Self::Factor(op)
    }
}

impl From<IpRiskRequest> for Operation {
    fn from(req: IpRiskRequest) -> Self {
        Self::IpRisk(req)
    }
}
