use alloy::{network::ReceiptResponse, primitives::TxHash, providers::Provider};
use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "#")]
    log_index: u64,
    #[tabled(rename = "Contract")]
    address: String,
    #[tabled(rename = "Topic 0")]
    topic: String,
    #[tabled(rename = "Data (bytes)")]
    data_len: usize,
}

pub(crate) async fn render<P: Provider>(provider: P, tx_hash: TxHash) -> anyhow::Result<()> {
    let receipt = provider
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or_else(|| anyhow::anyhow!("transaction {tx_hash} not found"))?;

    println!("\n{}\n", format!("**** Tx {}", tx_hash).bright_blue());
    let status = if receipt.status() { "success".green() } else { "reverted".red() };
    println!("  Status:    {status}");
    println!("  Block:     {}", receipt.block_number().unwrap_or_default());
    println!("  Gas used:  {}", receipt.gas_used());
    if let Some(to) = receipt.to() {
        println!("  To:        {to}");
    }

    let rows: Vec<LogRow> = receipt
        .inner
        .logs()
        .iter()
        .map(|log| LogRow {
            log_index: log.log_index.unwrap_or_default(),
            address: log.address().to_string(),
            topic: log.topics().first().map(ToString::to_string).unwrap_or_default(),
            data_len: log.data().data.len(),
        })
        .collect();
    if !rows.is_empty() {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("\n{}", table.to_string().cyan());
    }
    println!();

    Ok(())
}
