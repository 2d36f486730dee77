//! Example polling the dispatcher for the result of a dispatch

use covalent_rust_sdk::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let dispatch_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: poll_result <dispatch-id>"))?;

    let manager = ResultsManager::from_env()?;

    println!("Status of {}:", dispatch_id);
    let status_query = ResultQuery::default().status_only(true);
    match manager.get_result_with(&dispatch_id, &status_query).await? {
        Some(status) => println!("   {}", status),
        None => {
            eprintln!("   Dispatcher is not reachable");
            return Ok(());
        }
    }

    println!("Waiting for {} to finish...", dispatch_id);
    let result = manager
        .get_result_with(&dispatch_id, &ResultQuery::new(Wait::Long))
        .await?;
    if let Some(value) = result {
        println!("   {}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}
