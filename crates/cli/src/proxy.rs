use alloy::primitives::Address;
use colored::Colorize;
use stablecoin_sdk::{Sdk, client::ChainClient, num::Converter};

pub(crate) async fn render<C: ChainClient>(sdk: &Sdk<C>, account: Address) -> anyhow::Result<()> {
    match sdk.position.proxy_wallet(account).await? {
        Some(proxy) => println!("{} {}", "Proxy wallet:".bold(), proxy),
        None => println!("{}", format!("No proxy wallet for {account}").yellow()),
    }
    // Balance is optional, the stablecoin may not be configured
    if let Ok(balance) = sdk.position.stablecoin_balance(account).await {
        println!("{} {}", "Stablecoin balance:".bold(), Converter::default().from_units(balance));
    }
    Ok(())
}
