//! # tiq-extract
//!
//! Pulls a tag-management profile (tags, load rules, variables and code
//! extensions) from the platform API and materializes every active code
//! extension as a standalone script, wrapped for the point in the tag
//! runtime where it executes.
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`canonical`] | Recursive key sorting so snapshots diff cleanly |
//! | [`session`] | Auth token acquisition and API host migration |
//! | [`profile`] | Authenticated profile query |
//! | [`extension`] | Code resolution, metadata header, scope wrapping, emission gate |
//! | [`archive`] | Canonical JSON snapshots under the history directory |
//! | [`pipeline`] | The sequential fetch → archive → extract run |
//! | [`http`] | HTTP client capability (`reqwest` implementation) |
//! | [`store`] | Key-value file store capability (native and in-memory) |
//! | [`config`] | Run configuration |
//! | [`error`] | Error types with thiserror |
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiq_extract::config::ExtractConfig;
//! use tiq_extract::http::ReqwestClient;
//! use tiq_extract::pipeline::Pipeline;
//! use tiq_extract::store::NativeFileStore;
//!
//! # async fn example() -> tiq_extract::TiqResult<()> {
//! let config = ExtractConfig::new("acme", "main", "dev@acme.test", "api-key");
//! let mut pipeline = Pipeline::new(
//!     &config,
//!     Arc::new(ReqwestClient::new()),
//!     Arc::new(NativeFileStore::new(".")),
//! )?;
//! let report = pipeline.run().await?;
//! println!("wrote {} extensions", report.written.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod canonical;
pub mod config;
pub mod error;
pub mod extension;
pub mod http;
pub mod pipeline;
pub mod profile;
pub mod session;
pub mod store;

pub use error::{PipelineStage, TiqError, TiqResult};
