//! Signers and client for the identity appliance REST API.
//!
//! Every call is turned into a canonical request, signed with HMAC-SHA256
//! under the application key and sent with an `Authorization` and a `Date`
//! header.
//!
//! ## Example
//!
//! ```
//! use sarest_appliance::{prepare, Credential, FactorOperation, Operation};
//! use sarest_core::time::FixedTimeSource;
//!
//! # fn main() -> sarest_core::Result<()> {
//! let cred = Credential::new("app-1234", "0123456789abcdef0123456789abcdef", "secureauth1")?;
//! let op = Operation::from(FactorOperation::deliver_by_push("jdoe", "dev123")?);
//! let time = FixedTimeSource::from_http_date("Tue, 03 Jun 2025 14:00:00 GMT")?;
//!
//! let req = prepare(&op, &cred, &time)?;
//! assert_eq!(req.path(), "/secureauth1/api/v1/auth");
//! assert!(req.authorization().starts_with("SA-HMAC-SHA256 app-1234:secureauth1:"));
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::ApplianceEndpoint;

pub mod route;

mod operation;
pub use operation::{FactorOperation, IpRiskRequest, Operation};

mod canonical;
pub use canonical::CanonicalRequest;

mod sign_request;
pub use sign_request::{format_header, prepare, sign, PreparedRequest, RequestSigner};

mod client;
pub use client::{parse_json, Client};
