use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, DATE};
use http::{Method, StatusCode};
use log::{debug, warn};
use pretty_assertions::assert_eq;
use sarest_appliance::{
    parse_json, ApplianceEndpoint, CanonicalRequest, Client, Config, Credential, Operation,
};
use sarest_core::hash::base64_hmac_sha256;
use sarest_core::time::FixedTimeSource;
use sarest_core::{Context, Error, ErrorKind, HttpSend, OsEnv, Result};
use sarest_http_send_reqwest::ReqwestHttpSend;
use serde::Deserialize;

const TS: &str = "Tue, 03 Jun 2025 14:00:00 GMT";
const KEY: &str = "0123456789abcdef0123456789abcdef";

/// MockAppliance records every request and answers with a fixed response.
#[derive(Debug, Clone)]
struct MockAppliance {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockAppliance {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<http::Request<Bytes>> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

#[async_trait]
impl HttpSend for MockAppliance {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))?)
    }
}

#[derive(Debug)]
struct Unreachable;

#[async_trait]
impl HttpSend for Unreachable {
    async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected("connection reset by peer"))
    }
}

fn client(http: impl HttpSend) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_http_send(http)
        .with_time_source(FixedTimeSource::from_http_date(TS).unwrap());
    let endpoint = ApplianceEndpoint::new("idp.example.com", 443, true).unwrap();
    let cred = Credential::new("app-1234", KEY, "secureauth1").unwrap();

    Client::new(ctx, endpoint, cred)
}

/// Rebuild the signature the way the appliance verifies it.
fn verify(req: &http::Request<Bytes>) -> bool {
    let date = req.headers()[DATE].to_str().unwrap();
    let body = std::str::from_utf8(req.body()).unwrap();
    let canonical = CanonicalRequest::build(req.method(), req.uri().path(), Some(body), date)
        .unwrap();
    let expected = format!(
        "SA-HMAC-SHA256 app-1234:secureauth1:{}",
        base64_hmac_sha256(KEY.as_bytes(), canonical.as_bytes())
    );

    req.headers()[AUTHORIZATION] == expected.as_str()
}

#[tokio::test]
async fn test_every_operation_is_signed() -> Result<()> {
    let mock = MockAppliance::new(StatusCode::OK, r#"{"status":"valid","message":""}"#);
    let client = client(mock.clone());

    client.validate_user("jdoe").await?;
    client.validate_user_password("jdoe", "hunter2").await?;
    client.validate_kba("jdoe", "blue", "Question1").await?;
    client.validate_oath("jdoe", "123456", "dev123").await?;
    client.deliver_otp_by_phone("jdoe", "Phone1").await?;
    client.deliver_otp_by_sms("jdoe", "Phone1").await?;
    client.deliver_otp_by_email("jdoe", "Email1").await?;
    client.deliver_otp_by_push("jdoe", "dev123").await?;
    client.deliver_otp_by_help_desk("jdoe", "HelpDesk1").await?;
    client.factors_by_user("jdoe").await?;
    client.ip_evaluation("jdoe", "192.168.0.10").await?;

    let requests = mock.take();
    assert_eq!(requests.len(), 11);

    let kinds: Vec<String> = requests
        .iter()
        .filter(|r| r.method() == Method::POST)
        .map(|r| {
            let v: serde_json::Value = serde_json::from_slice(r.body()).unwrap();
            v["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "user_id",
            "password",
            "kba",
            "oath",
            "call",
            "sms",
            "email",
            "push",
            "help_desk",
            "risk"
        ]
    );

    for req in &requests {
        debug!("{} {}", req.method(), req.uri());
        assert_eq!(req.headers()[DATE], TS);
        assert!(verify(req), "signature of {} must verify", req.uri());
    }

    let factors = &requests[9];
    assert_eq!(factors.method(), Method::GET);
    assert_eq!(
        factors.uri().to_string(),
        "https://idp.example.com:443/secureauth1/api/v1/users/jdoe/factors"
    );
    assert!(factors.body().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_rejection_is_reported() {
    let mock = MockAppliance::new(StatusCode::UNAUTHORIZED, r#"{"message":"bad signature"}"#);
    let client = client(mock.clone());

    let err = client
        .validate_user_password("jdoe", "hunter2")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerRejected);
    assert!(err.is_server_rejection());
    assert!(err.message().contains("401"));
    assert_eq!(mock.take().len(), 1);
}

#[tokio::test]
async fn test_rejection_quotes_bounded_body() {
    let page: &'static str = Box::leak("<html>gateway timeout</html>".repeat(500).into_boxed_str());
    let client = client(MockAppliance::new(StatusCode::GATEWAY_TIMEOUT, page));

    let err = client.factors_by_user("jdoe").await.unwrap_err();
    assert!(err.is_server_rejection());
    assert!(err.message().contains("504"));
    assert!(err.message().ends_with("..."));
    assert!(err.message().len() < 512);
}

#[tokio::test]
async fn test_unreachable_is_reported() {
    let client = client(Unreachable);

    let err = client.validate_user("jdoe").await.unwrap_err();
    assert!(err.is_transport_error());
    assert!(!err.is_request_error());
}

#[tokio::test]
async fn test_invalid_request_is_not_sent() {
    let mock = MockAppliance::new(StatusCode::OK, "{}");
    let client = client(mock.clone());

    let err = client.deliver_otp_by_push("jdoe", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(err.is_request_error());

    let err = client.ip_evaluation("jdoe", "").await.unwrap_err();
    assert!(err.is_request_error());

    assert!(mock.take().is_empty());
}

#[tokio::test]
async fn test_parse_json() -> Result<()> {
    #[derive(Debug, Deserialize)]
    struct Status {
        status: String,
    }

    let mock = MockAppliance::new(StatusCode::OK, r#"{"status":"found","message":""}"#);
    let client = client(mock);

    let resp = client.validate_user("jdoe").await?;
    let status: Status = parse_json(&resp)?;
    assert_eq!(status.status, "found");

    let err = parse_json::<Status>(&http::Response::new(Bytes::from_static(b"<html>")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);

    Ok(())
}

#[tokio::test]
async fn test_prepare_is_reproducible() -> Result<()> {
    let client = client(MockAppliance::new(StatusCode::OK, "{}"));
    let op = Operation::list_factors("jdoe@example.com")?;

    let first = client.prepare(&op)?;
    let second = client.prepare(&op)?;
    assert_eq!(first, second);
    assert_eq!(first.path(), "/secureauth1/api/v1/users/jdoe%40example.com/factors");

    Ok(())
}

#[tokio::test]
async fn test_live_appliance() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("SAREST_TEST").ok().as_deref() != Some("on") {
        warn!("SAREST_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::new().from_env(&ctx)?;
    let client = Client::from_config(ctx, &config)?;

    let user_id = env::var("SAREST_TEST_USER_ID").expect("env SAREST_TEST_USER_ID must set");
    let resp = client.factors_by_user(&user_id).await?;
    debug!("got factors: {}", String::from_utf8_lossy(resp.body()));
    assert!(resp.status().is_success());

    Ok(())
}
