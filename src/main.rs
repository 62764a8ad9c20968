//! Railcount CLI
//!
//! Terminal dashboard for a trackside train counter:
//! - Watch the live event stream with summary charts
//! - Print the summary charts once
//! - List engine sightings
//! - Generate a config file

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use railcount::config::{generate_default_config, Config, LoggingConfig};
use railcount::terminal::{
    render_chart_result, render_daily_chart, render_engine_table, render_live_panel,
    render_log, render_recent_table, render_recent_trains,
};
use railcount::{
    LiveSnapshot, SummaryCharts, SummaryClient, SummaryLoader, WatchSession,
    DEFAULT_SNAPSHOT_LOG_LINES,
};

#[derive(Parser)]
#[command(name = "railcount")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live dashboard for a trackside train counter")]
#[command(long_about = "Railcount shows the train counter's daily and recent-train charts\nand follows its event stream: the active train, its speed, totals and engine numbers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Train counter server URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the live event stream
    Watch {
        /// Log entries shown under the live panel
        #[arg(short = 'n', long, default_value = "5")]
        log_lines: usize,
        /// Skip the summary charts at startup
        #[arg(long)]
        no_summary: bool,
    },

    /// Print the daily and recent-train charts
    Summary {
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List engine sightings per direction
    Engines {
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.base_url {
        config.server.base_url = url;
    }

    init_logging(&config.logging);
    tracing::info!("Railcount v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(base_url = %config.server.base_url, "Using train counter server");

    match cli.command {
        Commands::Watch {
            log_lines,
            no_summary,
        } => watch(&config, log_lines, no_summary).await,
        Commands::Summary { format } => summary(&config, format).await,
        Commands::Engines { format } => engines(&config, format).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("railcount={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout belongs to the dashboard
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn watch(config: &Config, log_lines: usize, no_summary: bool) -> anyhow::Result<()> {
    let redraw = std::io::stdout().is_terminal();
    // Piped output prints every entry, so it needs a deeper window to
    // bridge coalesced updates
    let snapshot_lines = if redraw {
        log_lines
    } else {
        log_lines.max(DEFAULT_SNAPSHOT_LOG_LINES * 5)
    };

    let WatchSession {
        mut updates,
        stream,
        mut summary,
    } = WatchSession::start(config, snapshot_lines, !no_summary)?;

    let mut summary_text = String::new();
    let mut frames_printed = 0;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if redraw {
                    draw(&summary_text, &snapshot, log_lines);
                } else {
                    frames_printed = print_new_entries(&snapshot, frames_printed);
                }
            }
            loaded = async {
                match summary.as_mut() {
                    Some(handle) => handle.await,
                    None => std::future::pending().await,
                }
            } => {
                summary = None;
                match loaded {
                    Ok(charts) => {
                        summary_text = render_summary(&charts);
                        if redraw {
                            draw(&summary_text, &updates.borrow().clone(), log_lines);
                        } else {
                            print!("{}", summary_text);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Summary task failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, closing stream");
                stream.abort();
                if let Some(handle) = &summary {
                    handle.abort();
                }
                return Ok(());
            }
        }
    }

    if let Some(handle) = summary {
        handle.abort();
    }

    let dashboard = stream.await.context("stream task panicked")??;
    tracing::info!(
        frames = dashboard.view().frames_received,
        dropped = dashboard.view().dropped_frames,
        "Stream finished"
    );
    Ok(())
}

fn draw(summary_text: &str, snapshot: &LiveSnapshot, log_lines: usize) {
    // Clear screen, cursor home
    print!("\x1B[2J\x1B[H");
    print!("{}", summary_text);
    println!();
    print!("{}", render_live_panel(&snapshot.view, &snapshot.status));
    println!();
    print!("{}", render_log(&snapshot.log, log_lines));
}

/// Print log entries that arrived since the last call; returns the new count
fn print_new_entries(snapshot: &LiveSnapshot, printed: u64) -> u64 {
    let logged = snapshot.view.frames_received - snapshot.view.dropped_frames;
    let fresh = logged.saturating_sub(printed) as usize;
    for entry in snapshot.log.iter().take(fresh).rev() {
        println!("{}", entry.text);
    }
    logged
}

async fn summary(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let loader = SummaryLoader::new(SummaryClient::new(&config.server)?);
    let charts = loader.load().await;

    match format {
        OutputFormat::Table => {
            print!("{}", render_summary(&charts));
            if let Ok(recent) = &charts.recent {
                println!();
                print!("{}", render_recent_table(&recent.rows));
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "daily": chart_json(&charts.daily),
                "recent": chart_json(&charts.recent),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if !charts.is_complete() {
        bail!("summary incomplete: at least one chart is unavailable");
    }
    Ok(())
}

fn render_summary(charts: &SummaryCharts) -> String {
    format!(
        "{}\n{}",
        render_chart_result("Daily trains and cars", &charts.daily, render_daily_chart),
        render_chart_result("Cars per recent train", &charts.recent, render_recent_trains),
    )
}

fn chart_json<T>(result: &railcount::DashboardResult<railcount::LoadedChart<T>>) -> serde_json::Value {
    match result {
        Ok(loaded) => serde_json::json!({ "chart": loaded.chart }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

async fn engines(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let client = SummaryClient::new(&config.server)?;
    let rows = client.fetch_engines_by_direction().await?;

    match format {
        OutputFormat::Table => print!("{}", render_engine_table(&rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_belongs_to_one_shot_commands() {
        let cli = Cli::try_parse_from(["railcount", "summary", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Summary {
                format: OutputFormat::Json
            }
        ));

        let cli = Cli::try_parse_from(["railcount", "engines", "-f", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Engines {
                format: OutputFormat::Json
            }
        ));

        let cli = Cli::try_parse_from(["railcount", "summary"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Summary {
                format: OutputFormat::Table
            }
        ));

        assert!(Cli::try_parse_from(["railcount", "watch", "--format", "json"]).is_err());
        assert!(Cli::try_parse_from(["railcount", "config", "--format", "json"]).is_err());
    }

    #[test]
    fn test_global_flags_still_reach_subcommands() {
        let cli = Cli::try_parse_from([
            "railcount",
            "watch",
            "-n",
            "12",
            "--base-url",
            "http://trains.local:8000",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://trains.local:8000"));
        assert!(matches!(
            cli.command,
            Commands::Watch {
                log_lines: 12,
                no_summary: false
            }
        ));
    }
}
