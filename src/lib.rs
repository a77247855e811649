//! Rust SDK for the Cloudcraft API.
//!
//! ```no_run
//! use cloudcraft::{
//!     Cloudcraft,
//!     types::{CloudcraftConfig, DeleteAzureAccountInput},
//! };
//!
//! # async fn delete() -> Result<(), Box<dyn std::error::Error>> {
//! let key = std::env::var("CLOUDCRAFT_API_KEY")?;
//! let cloudcraft = Cloudcraft::new(CloudcraftConfig::new(key))?;
//! cloudcraft
//!     .azure()
//!     .delete_account(DeleteAzureAccountInput::new("my-account-id".parse()?))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod ops;

pub mod types;

pub use ops::{Cloudcraft, CloudcraftAzure};
