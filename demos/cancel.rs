//! Example cancelling a dispatch or some of its tasks

use covalent_rust_sdk::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dispatch_id = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: cancel <dispatch-id> [task-id...]"))?;
    let task_ids = args
        .map(|arg| arg.parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let manager = ResultsManager::from_env()?;
    let message = manager.cancel(&dispatch_id, task_ids).await?;
    println!("{}", message);

    Ok(())
}
