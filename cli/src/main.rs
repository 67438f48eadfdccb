use clap::Parser;
use goto_cli::goto_cmd::GotoCommand;
use goto_cli::goto_cmd::run_goto;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = GotoCommand::parse();

    // stdout carries results; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run_goto(cmd).await
}
