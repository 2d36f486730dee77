//! # Covalent Rust SDK
//!
//! This crate provides a Rust client for retrieving the results of Covalent
//! dispatches and cancelling their tasks.
//!
//! ## Features
//!
//! - **Result polling**: Query a dispatch by id, short or long poll
//! - **Retry Logic**: Busy answers carrying `Retry-After` are retried
//! - **Cancellation**: Cancel a whole dispatch or selected tasks
//! - **Configuration**: `covalent.conf` and `COVALENT_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use covalent_rust_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let manager = ResultsManager::new(Config::load()?)?;
//!
//!     let query = ResultQuery::new(Wait::Long);
//!     match manager.get_result_with("9d1b308b-4763-4990-ae7f-6a6e36d35893", &query).await? {
//!         Some(result) => println!("Result: {}", result),
//!         None => println!("Dispatcher is not reachable"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod results;

pub use error::{Result, SdkError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigProvider, MapConfig};
    pub use crate::results::{ResultQuery, ResultsManager, TaskIds, Wait};
    pub use crate::error::{Result, SdkError};
    pub use serde_json::{json, Value};
}
