//! Benchmark chart widget controller
//!
//! Ties the pieces together: fetch once per mount, index, pick the default
//! test case, and recompute the chart whenever the selection changes.
//!
//! ```no_run
//! use bench_chart::fetch::HttpFeedSource;
//! use bench_chart::widget::{BenchmarkWidget, DisplayContext};
//!
//! let source = HttpFeedSource::published().unwrap();
//! let mut widget = BenchmarkWidget::new();
//! widget.on_change(|test_case, chart| println!("{}: {} points", test_case, chart.len()));
//! widget.mount(DisplayContext::Interactive, &source);
//! widget.select("es/full/minify/libraries/antd");
//! ```

use crate::chart::{ActiveElement, ChartBuilder, ChartConfig, Navigator};
use crate::fetch::FeedSource;
use crate::index::HistoryIndex;
use crate::selection::SelectionState;
use tracing::{debug, info, warn};

/// Where the widget is being mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayContext {
    /// Ahead-of-time page generation; nothing may be fetched or drawn
    StaticGeneration,
    /// A live display that can fetch and draw
    Interactive,
}

impl DisplayContext {
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// What the widget currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// No feed indexed yet
    Loading,
    /// A feed is indexed; the chart may still be empty
    Ready,
    /// Fetching or parsing the feed failed
    Failed(String),
}

type ChangeListener = Box<dyn FnMut(&str, &ChartConfig)>;

/// Controller for one mounted benchmark chart
pub struct BenchmarkWidget {
    state: DisplayState,
    index: HistoryIndex,
    selection: SelectionState,
    chart: Option<ChartConfig>,
    listeners: Vec<ChangeListener>,
}

impl Default for BenchmarkWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkWidget {
    pub fn new() -> Self {
        Self {
            state: DisplayState::Loading,
            index: HistoryIndex::default(),
            selection: SelectionState::new(),
            chart: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback run with the newly selected test case and its chart
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&str, &ChartConfig) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Fetch and index the feed, unless running outside an interactive context
    /// or already mounted.
    pub fn mount(&mut self, context: DisplayContext, source: &dyn FeedSource) {
        if !context.is_interactive() {
            debug!("Not an interactive context, deferring feed fetch");
            return;
        }
        if self.state == DisplayState::Ready {
            debug!("Widget already mounted");
            return;
        }

        info!("Fetching benchmark feed from {}", source.describe());
        match source.fetch() {
            Ok(feed) => {
                let index = HistoryIndex::build(&feed);
                info!(
                    "Loaded {} runs, {} test cases",
                    feed.entries().len(),
                    index.len()
                );
                self.initialize(index);
            }
            Err(e) => {
                warn!("Failed to load benchmark feed: {}", e);
                self.state = DisplayState::Failed(e.to_string());
            }
        }
    }

    /// Install an already built index and select its first test case
    pub fn initialize(&mut self, index: HistoryIndex) {
        self.index = index;
        self.selection.initialize(&self.index);
        self.state = DisplayState::Ready;
        self.recompute();
    }

    /// Switch test case; unknown keys are ignored.
    ///
    /// Returns `true` when the selection changed.
    pub fn select(&mut self, key: &str) -> bool {
        if !self.selection.select(&self.index, key) {
            return false;
        }
        self.recompute();
        true
    }

    /// Handle a click on the chart, navigating to the commit under the pointer
    pub fn click(&self, active: &[ActiveElement], navigator: &mut dyn Navigator) -> Option<&str> {
        let url = self.chart.as_ref()?.click(active, navigator)?;
        debug!("Opened {}", url);
        Some(url)
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Chart for the current test case; `None` while loading or failed
    pub fn chart(&self) -> Option<&ChartConfig> {
        self.chart.as_ref()
    }

    pub fn current(&self) -> Option<&str> {
        self.selection.current()
    }

    /// Test case names for the dropdown
    pub fn test_cases(&self) -> &[String] {
        self.index.keys()
    }

    pub fn index(&self) -> &HistoryIndex {
        &self.index
    }

    /// The feed's last update, formatted for display
    pub fn last_updated_display(&self) -> Option<String> {
        self.selection
            .last_updated()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }

    fn recompute(&mut self) {
        let Some(key) = self.selection.current() else {
            self.chart = None;
            return;
        };
        let records = self.index.get(key).unwrap_or(&[]);
        let chart = ChartBuilder::new(key, records).build();

        for listener in &mut self.listeners {
            listener(key, &chart);
        }
        self.chart = Some(chart);
    }
}
