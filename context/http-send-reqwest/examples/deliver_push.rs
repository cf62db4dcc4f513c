//! Send a push notification through an appliance configured by env:
//!
//! ```shell
//! SAREST_HOST=idp.example.com SAREST_REALM=secureauth1 \
//! SAREST_APPLICATION_ID=... SAREST_APPLICATION_KEY=... \
//! cargo run --example deliver_push -- jdoe z0y9x87wv6u5t43srq2p1on
//! ```

use anyhow::Result;
use log::info;
use sarest_appliance::{Client, Config};
use sarest_core::{Context, OsEnv};
use sarest_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let user_id = args.next().unwrap_or_else(|| "jdoe".to_string());
    let factor_id = args.next().unwrap_or_else(|| "Phone1".to_string());

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::new().from_env(&ctx)?;
    let client = Client::from_config(ctx, &config)?;

    match client.deliver_otp_by_push(&user_id, &factor_id).await {
        Ok(resp) => info!("push sent: {}", String::from_utf8_lossy(resp.body())),
        Err(err) if err.is_server_rejection() => info!("appliance refused the push: {err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
