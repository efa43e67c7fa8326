//! bench-chart - Historical benchmark charts from a github-action-benchmark feed
//!
//! Fetches the published benchmark history, regroups it per test case, and
//! derives Chart.js line chart configurations that link every point back to
//! its commit.
//!
//! # Features
//!
//! - Parse the `benchmark-data.json` feed (or its `data.js` form)
//! - Index runs by test case, preserving feed order
//! - Track the selected test case and recompute the chart on change
//! - Derive axis labels, tooltips and click-through targets for Chart.js
//! - Generate a standalone HTML page with a test case picker
//!
//! # Example
//!
//! ```no_run
//! use bench_chart::{chart::ChartBuilder, feed::FeedDocument, index::HistoryIndex};
//!
//! let feed = FeedDocument::load_from_file("benchmark-data.json".as_ref()).unwrap();
//! let index = HistoryIndex::build(&feed);
//!
//! if let Some(name) = index.first_key() {
//!     let chart = ChartBuilder::new(name, index.get(name).unwrap_or(&[])).build();
//!     println!("{}: {:?}", name, chart.values());
//! }
//! ```

pub mod chart;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod html;
pub mod index;
pub mod selection;
pub mod widget;

pub use error::{Error, Result};
