use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use tiq_extract::config::{
    ExtractConfig, DEFAULT_API_HOST, DEFAULT_EXTENSIONS_DIR, DEFAULT_HISTORY_DIR,
};
use tiq_extract::http::ReqwestClient;
use tiq_extract::pipeline::Pipeline;
use tiq_extract::store::NativeFileStore;

#[derive(Debug, Parser)]
#[command(
    name = "tiq-extract",
    about = "Fetch a tag-management profile and write its code extensions as scripts"
)]
struct Cli {
    #[arg(long, env = "TIQ_API_HOST", default_value = DEFAULT_API_HOST, help = "API host used for the first auth call")]
    api_host: String,

    #[arg(long, env = "TIQ_ACCOUNT")]
    account: String,

    #[arg(long, env = "TIQ_PROFILE")]
    profile: String,

    #[arg(long, env = "TIQ_USERNAME")]
    username: String,

    #[arg(long, env = "TIQ_KEY", hide_env_values = true)]
    key: String,

    #[arg(long, env = "TIQ_OUTPUT_ROOT", default_value = ".", help = "Directory all output keys resolve against")]
    output_root: PathBuf,

    #[arg(long, env = "TIQ_HISTORY_DIR", default_value = DEFAULT_HISTORY_DIR)]
    history_dir: String,

    #[arg(long, env = "TIQ_EXTENSIONS_DIR", default_value = DEFAULT_EXTENSIONS_DIR)]
    extensions_dir: String,
}

impl Cli {
    fn config(&self) -> ExtractConfig {
        ExtractConfig::new(&self.account, &self.profile, &self.username, &self.key)
            .with_api_host(&self.api_host)
            .with_history_dir(&self.history_dir)
            .with_extensions_dir(&self.extensions_dir)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let store = Arc::new(NativeFileStore::new(&cli.output_root));
    let mut pipeline = Pipeline::new(&config, Arc::new(ReqwestClient::new()), store)?;
    let report = pipeline.run().await?;
    tracing::info!(
        written = report.written.len(),
        inactive = report.inactive.len(),
        "Extensions written to {}",
        cli.output_root.join(&cli.extensions_dir).display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
