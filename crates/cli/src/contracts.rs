use colored::Colorize;
use stablecoin_sdk::registry::ContractRegistry;

pub(crate) fn render(registry: &ContractRegistry, chain_id: u64) {
    if registry.contracts(chain_id).is_empty() {
        println!(
            "{}",
            format!("No deployments configured for connected chain {chain_id}, see `--config`").yellow()
        );
    } else {
        println!("{}", format!("Connected to chain {chain_id}").bright_blue());
    }
    if !registry.chain_ids().is_empty() {
        println!("{registry}");
    }
}
