//! Print the Connect authorization URL for a set of permissions.
//!
//! ```text
//! RUST_LOG=debug cargo run --example authorize_url -- APP-XXXXXXXXXXXX https://example.com/callback
//! ```

use anyhow::Context;
use moip_connect::{Config, ConnectAuth, ScopeMapping};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let client_id = args.next().context("usage: authorize_url <client_id> <redirect_uri>")?;
    let redirect_uri = args.next().context("usage: authorize_url <client_id> <redirect_uri>")?;

    let mut connect =
        ConnectAuth::with_config(Config::default().with_scope_mapping(ScopeMapping::Distinct));
    connect
        .set_client_id(client_id)
        .set_redirect_uri(redirect_uri)
        .apply_permissions(&json!({
            "receive_funds": true,
            "refund": true,
            "retrieve_financial_info": true,
        }))?;

    let url = connect.authorize_url()?;
    log::info!("Requesting scopes: {:?}", connect.scope_tokens());
    println!("Visit: {}", url);

    Ok(())
}
