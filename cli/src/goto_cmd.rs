use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use goto_anything::ActiveSearch;
use goto_anything::GotoConfig;
use goto_anything::Navigation;
use goto_anything::NavigationSink;
use goto_anything::Panel;
use goto_anything::PanelKey;
use goto_anything::RenderedResult;
use goto_anything::TickStatus;
use goto_anything::load_project;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "goto",
    about = "Jump to files, symbols and lines of an Ink project"
)]
pub struct GotoCommand {
    /// Search query; words are joined with single spaces.
    #[arg(value_name = "QUERY", num_args = 0.., trailing_var_arg = true)]
    pub query: Vec<String>,

    /// Project root to load.
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Relative path of the file open in the editor.
    #[arg(long = "active", value_name = "PATH")]
    pub active: Option<String>,

    /// TOML file with goto settings.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keys replayed once the search completes (down, up, enter, esc).
    #[arg(long = "keys", value_name = "KEY", value_delimiter = ',')]
    pub keys: Vec<PanelKey>,

    /// Rows available to the result list while replaying keys.
    #[arg(long = "height", value_name = "ROWS", default_value_t = 20)]
    pub viewport_height: usize,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum OutputEvent<'a> {
    Result(&'a RenderedResult),
    Navigation(&'a Navigation),
}

pub async fn run_goto(cmd: GotoCommand) -> Result<()> {
    let config = match &cmd.config {
        Some(path) => GotoConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GotoConfig::default(),
    };
    let mut project = load_project(&cmd.project_root, &config.project).with_context(|| {
        format!(
            "failed to load project at {}",
            cmd.project_root.display()
        )
    })?;
    if let Some(active) = cmd.active.as_deref()
        && project.set_active_path(active).is_none()
    {
        bail!("active file `{active}` is not part of the project");
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let focus_delay = config.focus_delay();
    let mut panel = Panel::new(config, tx);
    panel.set_viewport_height(cmd.viewport_height);
    panel.show(Arc::new(project));
    time::sleep(focus_delay).await;
    panel.focus_input();

    let query = cmd.query.join(" ");
    if let Some(active) = panel.set_query(&query)? {
        drive(&mut panel, active).await;
    }
    for result in panel.rendered() {
        emit(cmd.output_format, OutputEvent::Result(result))?;
    }

    for key in &cmd.keys {
        if !panel.handle_key(*key)? {
            debug!("panel closed, ignoring remaining keys");
            break;
        }
    }
    drop(panel);
    while let Some(navigation) = rx.recv().await {
        emit(cmd.output_format, OutputEvent::Navigation(&navigation))?;
    }
    Ok(())
}

/// Tick `active` on its period until it finishes or is cancelled.
async fn drive<S: NavigationSink>(panel: &mut Panel<S>, active: ActiveSearch) {
    let mut interval = time::interval(active.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick already ran inside set_query.
    interval.tick().await;
    loop {
        tokio::select! {
            _ = active.token.cancelled() => break,
            _ = interval.tick() => {
                if panel.tick(active.id) != TickStatus::More {
                    break;
                }
            }
        }
    }
}

fn emit(format: OutputFormat, event: OutputEvent<'_>) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&event)?);
        }
        OutputFormat::Text => match event {
            OutputEvent::Result(result) => println!("{}", format_result(result)),
            OutputEvent::Navigation(navigation) => println!("goto {navigation}"),
        },
    }
    Ok(())
}

fn format_result(result: &RenderedResult) -> String {
    let mut line = format!(
        "{} {}{}",
        result.kind().glyph(),
        result.breadcrumb.as_deref().unwrap_or_default(),
        result.label.wrap("[", "]")
    );
    if let Some(location) = result.location.as_deref() {
        line.push_str("  ");
        line.push_str(location);
        if let Some(row) = result.result.row() {
            line.push_str(&format!(":{}", row + 1));
        }
    }
    line
}
