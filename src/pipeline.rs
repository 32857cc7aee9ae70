//! One batch run: fetch the profile, archive it, and write a script for
//! every eligible extension.
//!
//! Steps run strictly in order and the first failure aborts the run. Files
//! written before the failure are left in place.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::archive::{join_key, ArchiveWriter};
use crate::canonical::canonicalize;
use crate::config::ExtractConfig;
use crate::error::{PipelineStage, TiqError, TiqResult};
use crate::extension::{extract, Extraction, SkipReason};
use crate::http::HttpClient;
use crate::profile::ProfileFetcher;
use crate::session::SessionManager;
use crate::store::FileStore;

pub const MAIN_SNAPSHOT: &str = "main";
pub const EXTENSIONS_SNAPSHOT: &str = "extensions";

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Keys of the archived snapshots, in write order.
    pub snapshots: Vec<String>,
    /// Ids of extensions whose script was written, in profile order.
    pub written: Vec<String>,
    /// Ids of extensions with code that were suppressed as inactive.
    pub inactive: Vec<String>,
    /// Entries without resolvable code.
    pub no_code: usize,
    /// Entries that were not objects or had no usable id.
    pub invalid: usize,
}

pub struct Pipeline {
    fetcher: ProfileFetcher,
    archive: ArchiveWriter,
    store: Arc<dyn FileStore>,
    extensions_dir: String,
}

impl Pipeline {
    pub fn new(
        config: &ExtractConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn FileStore>,
    ) -> TiqResult<Self> {
        config.validate()?;
        let session = SessionManager::new(http, config.credentials(), config.api_host.clone());
        Ok(Self {
            fetcher: ProfileFetcher::new(session),
            archive: ArchiveWriter::new(store.clone(), config.history_dir.clone()),
            store,
            extensions_dir: config.extensions_dir.clone(),
        })
    }

    /// Store key for the script of extension `id`.
    pub fn artifact_key(&self, id: &str) -> String {
        join_key(&self.extensions_dir, &format!("{id}.js"))
    }

    pub async fn run(&mut self) -> TiqResult<RunReport> {
        let profile = canonicalize(&self.fetcher.fetch_profile().await?);
        let mut report = RunReport::default();

        let key = self
            .archive
            .archive(MAIN_SNAPSHOT, &profile)
            .await
            .map_err(|e| e.at(PipelineStage::Archive))?;
        report.snapshots.push(key);

        let extensions = profile
            .get("extensions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TiqError::Profile("profile has no extensions array".into())
                    .at(PipelineStage::FetchProfile)
            })?;

        let key = self
            .archive
            .archive(EXTENSIONS_SNAPSHOT, &Value::Array(extensions.clone()))
            .await
            .map_err(|e| e.at(PipelineStage::Archive))?;
        report.snapshots.push(key);

        tracing::info!(count = extensions.len(), "Extracting extensions");
        for (index, extension) in extensions.iter().enumerate() {
            self.process(index, extension, &mut report)
                .await
                .map_err(|e| e.at(PipelineStage::WriteArtifact))?;
        }

        tracing::info!(
            written = report.written.len(),
            inactive = report.inactive.len(),
            no_code = report.no_code,
            invalid = report.invalid,
            "Run complete"
        );
        Ok(report)
    }

    async fn process(
        &self,
        index: usize,
        extension: &Value,
        report: &mut RunReport,
    ) -> TiqResult<()> {
        match extract(extension)? {
            Extraction::Emit(artifact) => {
                let key = self.artifact_key(&artifact.id);
                self.store.write(&key, &artifact.content).await?;
                tracing::debug!(id = %artifact.id, scope = ?artifact.scope, key = %key, "Wrote extension");
                report.written.push(artifact.id);
            }
            Extraction::Inactive { id } => {
                tracing::debug!(id = %id, "Skipping inactive extension");
                report.inactive.push(id);
            }
            Extraction::Skipped(SkipReason::NoCode) => {
                tracing::debug!(index, "Extension has no resolvable code");
                report.no_code += 1;
            }
            Extraction::Skipped(reason) => {
                tracing::warn!(index, ?reason, "Ignoring malformed extension entry");
                report.invalid += 1;
            }
        }
        Ok(())
    }
}
