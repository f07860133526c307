use anyhow::{Context, Result};
use coredns_ci::cli::{self, output::Reporter, Cli};
use coredns_ci::execution::{HttpUploader, StepEngine, WorkspaceLayout};
use coredns_ci::runner::SubprocessRunner;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Argument errors still end with a CO_RESULT marker and exit 1
    let cli = match Cli::try_from_args() {
        Ok(cli) => cli,
        Err(e) if cli::is_informational(&e) => e.exit(),
        Err(e) => std::process::exit(cli::report_usage_error(&e, &mut Reporter::stdio())),
    };

    // Logs go to stderr; stdout is reserved for [COUT] lines
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let layout = WorkspaceLayout::from_gopath(cli.gopath_lossy().as_deref());
    let engine = StepEngine::new(SubprocessRunner::new(), HttpUploader::new(), layout);
    let mut reporter = Reporter::stdio();

    let data = cli.data_lossy();
    let code = cli::run_step(data.as_deref(), &engine, &mut reporter).await;
    std::process::exit(code);
}
