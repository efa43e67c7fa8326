//! bench-chart CLI - Browse benchmark history per test case

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use bench_chart::{
    chart::{ActiveElement, ChartConfig, Navigator},
    fetch::{self, DEFAULT_FEED_URL},
    html::{self, PageConfig},
    index::HistoryIndex,
    widget::{BenchmarkWidget, DisplayContext, DisplayState},
    Error,
};

/// bench-chart: benchmark history charts for github-action-benchmark data
#[derive(Parser, Debug)]
#[command(name = "bench-chart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Feed location (http(s) URL or local path)
    #[arg(long, global = true, env = "BENCH_CHART_FEED", default_value = DEFAULT_FEED_URL)]
    feed: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List test cases
    List,

    /// Show the chart data for a test case
    Show(ShowArgs),

    /// Resolve a click on a chart point to its commit URL
    Open(OpenArgs),

    /// Generate the HTML page
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Test case name (defaults to the first one in the feed)
    #[arg(short, long)]
    case: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Parser, Debug)]
struct OpenArgs {
    /// Test case name
    #[arg(short, long)]
    case: String,

    /// Index of the clicked point
    #[arg(short, long)]
    point: usize,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output directory for the page
    #[arg(short, long, default_value = "dev/bench")]
    output_dir: PathBuf,

    /// Page title
    #[arg(long, default_value = "Benchmark History")]
    title: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

/// Prints the URL instead of launching a browser
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn open_in_new_context(&mut self, url: &str) {
        println!("{}", url);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::List => list_command(&cli.feed),
        Commands::Show(args) => show_command(&cli.feed, args),
        Commands::Open(args) => open_command(&cli.feed, args),
        Commands::Render(args) => render_command(&cli.feed, args),
    }
}

/// Mount a widget on the feed, failing if it could not be loaded
fn load_widget(feed: &str) -> Result<BenchmarkWidget> {
    let source = fetch::source_for(feed).with_context(|| format!("Invalid feed location: {}", feed))?;

    let mut widget = BenchmarkWidget::new();
    widget.mount(DisplayContext::Interactive, source.as_ref());

    match widget.state() {
        DisplayState::Ready => Ok(widget),
        DisplayState::Failed(message) => {
            anyhow::bail!("Failed to load benchmark feed from {}: {}", feed, message)
        }
        DisplayState::Loading => anyhow::bail!("Benchmark feed was not loaded"),
    }
}

/// Select `case` on the widget, treating unknown names as an error
fn select_case(widget: &mut BenchmarkWidget, case: Option<&str>) -> Result<()> {
    if let Some(case) = case {
        if !widget.index().contains(case) {
            return Err(Error::UnknownTestCase(case.to_string()).into());
        }
        widget.select(case);
    }
    Ok(())
}

fn current_chart(widget: &BenchmarkWidget) -> Result<&ChartConfig> {
    widget
        .chart()
        .ok_or_else(|| anyhow::anyhow!("The feed contains no benchmark results"))
}

/// List test cases
fn list_command(feed: &str) -> Result<()> {
    let widget = load_widget(feed)?;
    let index: &HistoryIndex = widget.index();

    if let Some(updated) = widget.last_updated_display() {
        println!("Last updated: {}\n", updated);
    }

    for (name, records) in index.iter() {
        let unit = records.first().map(|r| r.bench.unit.as_str()).unwrap_or("");
        println!("{} ({} runs, {})", name, records.len(), unit);
    }

    info!("{} test cases, {} results", index.len(), index.total_records());

    Ok(())
}

/// Show the chart for a test case
fn show_command(feed: &str, args: ShowArgs) -> Result<()> {
    let mut widget = load_widget(feed)?;
    select_case(&mut widget, args.case.as_deref())?;
    let chart = current_chart(&widget)?;

    match args.format {
        Format::Json => {
            let output = serde_json::json!({
                "data": chart.data,
                "options": chart.options,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Format::Text => {
            println!("## {}\n", widget.current().unwrap_or_default());
            for (value, label) in chart.values().iter().zip(chart.tooltip_labels()) {
                println!("  {:>12}  {}", value, label);
            }
        }
    }

    Ok(())
}

/// Resolve a click on a point
fn open_command(feed: &str, args: OpenArgs) -> Result<()> {
    let mut widget = load_widget(feed)?;
    select_case(&mut widget, Some(args.case.as_str()))?;

    let clicked = [ActiveElement { index: args.point }];
    if widget.click(&clicked, &mut StdoutNavigator).is_none() {
        anyhow::bail!(
            "Test case '{}' has no point at index {}",
            args.case,
            args.point
        );
    }

    Ok(())
}

/// Generate the HTML page
fn render_command(feed: &str, args: RenderArgs) -> Result<()> {
    info!("Generating benchmark page");

    let source = fetch::source_for(feed).with_context(|| format!("Invalid feed location: {}", feed))?;
    let document = source
        .fetch()
        .with_context(|| format!("Failed to load benchmark feed from {}", feed))?;

    let config = PageConfig {
        title: args.title,
        output_dir: args.output_dir.to_string_lossy().to_string(),
    };

    let repo_path = std::env::current_dir()?;
    let page = html::write_page(&document, &config, &repo_path)
        .with_context(|| "Failed to generate benchmark page")?;

    info!("Page generated at {:?}", page);

    Ok(())
}
