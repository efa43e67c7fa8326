//! Chart.js configuration for one test case
//!
//! [`ChartBuilder`] turns a test case history into the `data`/`options` pair a
//! line chart consumes, plus a per-point tooltip table and the commit URLs
//! used for click-through. The serialized field names follow Chart.js.

use crate::index::PerTestCaseRecord;
use serde::{Deserialize, Serialize};

/// Characters of the commit id shown on the x axis
pub const COMMIT_LABEL_LEN: usize = 7;

/// Line colour
pub const BORDER_COLOR: &str = "#dea584";

/// Point fill colour (line colour at ~38% alpha)
pub const BACKGROUND_COLOR: &str = "#dea58460";

const X_AXIS_TITLE: &str = "commit";

/// `data` argument of a Chart.js line chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
}

/// `options` argument of a Chart.js line chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartOptions {
    pub scales: Scales,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

impl AxisTitle {
    fn shown(text: impl Into<String>) -> Self {
        Self {
            display: true,
            text: text.into(),
        }
    }
}

/// Precomputed tooltip text for one point
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointTooltip {
    /// Text under the tooltip title: commit message, timestamp and committer
    pub after_title: String,
    /// Appended to the native label: unit and optional range
    pub label_suffix: String,
    /// Trailing line: the extra annotation, or empty
    pub after_label: String,
}

/// A pointer-activated chart element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveElement {
    /// Index of the point within the dataset
    pub index: usize,
}

/// Opens a URL in a new browser context (tab, window, ...)
pub trait Navigator {
    fn open_in_new_context(&mut self, url: &str);
}

/// Everything needed to draw and interact with one test case chart
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub data: ChartData,
    pub options: ChartOptions,
    pub tooltips: Vec<PointTooltip>,
    pub commit_urls: Vec<String>,
}

impl ChartConfig {
    /// X axis labels (abbreviated commit ids)
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Y values of the single dataset
    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn y_axis_title(&self) -> &str {
        &self.options.scales.y.title.text
    }

    pub fn len(&self) -> usize {
        self.data.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.labels.is_empty()
    }

    /// Tooltip `afterTitle` hook
    pub fn after_title(&self, index: usize) -> Option<&str> {
        self.tooltips.get(index).map(|t| t.after_title.as_str())
    }

    /// Tooltip `label` hook: native label, unit, then range in parentheses
    pub fn label(&self, index: usize, native_label: &str) -> Option<String> {
        self.tooltips
            .get(index)
            .map(|t| format!("{}{}", native_label, t.label_suffix))
    }

    /// Tooltip label of every point, as the renderer shows it: the x label
    /// (abbreviated commit id) is the native label passed to [`label`](Self::label).
    pub fn tooltip_labels(&self) -> Vec<String> {
        self.data
            .labels
            .iter()
            .enumerate()
            .filter_map(|(i, native)| self.label(i, native))
            .collect()
    }

    /// Tooltip `afterLabel` hook
    pub fn after_label(&self, index: usize) -> Option<&str> {
        self.tooltips.get(index).map(|t| t.after_label.as_str())
    }

    /// URL of the commit behind the first active element, if any
    pub fn click_target(&self, active: &[ActiveElement]) -> Option<&str> {
        let first = active.first()?;
        self.commit_urls.get(first.index).map(String::as_str)
    }

    /// Follow a click: open the commit in a new context when a point was hit.
    ///
    /// Returns the opened URL.
    pub fn click<'a>(
        &'a self,
        active: &[ActiveElement],
        navigator: &mut dyn Navigator,
    ) -> Option<&'a str> {
        let url = self.click_target(active)?;
        navigator.open_in_new_context(url);
        Some(url)
    }
}

/// Derives a [`ChartConfig`] from one test case history
pub struct ChartBuilder<'a> {
    test_case: &'a str,
    records: &'a [PerTestCaseRecord],
}

impl<'a> ChartBuilder<'a> {
    pub fn new(test_case: &'a str, records: &'a [PerTestCaseRecord]) -> Self {
        Self { test_case, records }
    }

    pub fn build(&self) -> ChartConfig {
        let labels = self
            .records
            .iter()
            .map(|r| short_commit_id(&r.commit.id))
            .collect();
        let data = self.records.iter().map(|r| r.bench.value).collect();

        let y_title = self
            .records
            .first()
            .map(|r| r.bench.unit.clone())
            .unwrap_or_default();

        ChartConfig {
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: self.test_case.to_string(),
                    data,
                    border_color: BORDER_COLOR.to_string(),
                    background_color: BACKGROUND_COLOR.to_string(),
                }],
            },
            options: ChartOptions {
                scales: Scales {
                    x: Axis {
                        title: AxisTitle::shown(X_AXIS_TITLE),
                        begin_at_zero: None,
                    },
                    y: Axis {
                        title: AxisTitle::shown(y_title),
                        begin_at_zero: Some(true),
                    },
                },
            },
            tooltips: self.records.iter().map(point_tooltip).collect(),
            commit_urls: self.records.iter().map(|r| r.commit.url.clone()).collect(),
        }
    }
}

/// First [`COMMIT_LABEL_LEN`] characters of a commit id
pub fn short_commit_id(id: &str) -> String {
    id.chars().take(COMMIT_LABEL_LEN).collect()
}

fn point_tooltip(record: &PerTestCaseRecord) -> PointTooltip {
    let commit = &record.commit;
    let bench = &record.bench;

    let after_title = format!(
        "\n{}\n\n{} committed by @{}\n",
        commit.message, commit.timestamp, commit.committer.username
    );

    let mut label_suffix = format!(" {}", bench.unit);
    if let Some(range) = bench.range.as_deref().filter(|r| !r.is_empty()) {
        label_suffix.push_str(&format!(" ({})", range));
    }

    let after_label = match bench.extra.as_deref() {
        Some(extra) if !extra.is_empty() => format!("\n{}", extra),
        _ => String::new(),
    };

    PointTooltip {
        after_title,
        label_suffix,
        after_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::parse_feed;
    use crate::index::HistoryIndex;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingNavigator(Vec<String>);

    impl Navigator for RecordingNavigator {
        fn open_in_new_context(&mut self, url: &str) {
            self.0.push(url.to_string());
        }
    }

    fn parse_chart() -> ChartConfig {
        let index = HistoryIndex::build(&parse_feed());
        ChartBuilder::new("parse", index.get("parse").unwrap()).build()
    }

    #[test]
    fn test_two_entry_scenario() {
        let chart = parse_chart();

        assert_eq!(chart.labels(), ["abcdef1", "0987654"]);
        assert_eq!(chart.values(), [10.0, 12.0]);
        assert_eq!(chart.y_axis_title(), "ms");
        assert_eq!(chart.options.scales.x.title.text, "commit");
        assert_eq!(chart.options.scales.y.begin_at_zero, Some(true));
        assert_eq!(chart.data.datasets[0].label, "parse");
    }

    #[test]
    fn test_click_navigates_to_commit() {
        let chart = parse_chart();
        let mut navigator = RecordingNavigator::default();

        let opened = chart.click(&[ActiveElement { index: 0 }], &mut navigator);
        assert_eq!(
            opened,
            Some("https://github.com/swc-project/swc/commit/abcdef1234")
        );

        assert_eq!(chart.click(&[], &mut navigator), None);
        assert_eq!(chart.click(&[ActiveElement { index: 5 }], &mut navigator), None);
        assert_eq!(
            navigator.0,
            vec!["https://github.com/swc-project/swc/commit/abcdef1234".to_string()]
        );
    }

    #[test]
    fn test_empty_history() {
        let chart = ChartBuilder::new("parse", &[]).build();

        assert!(chart.is_empty());
        assert_eq!(chart.y_axis_title(), "");
        assert!(chart.labels().is_empty());
        assert!(chart.values().is_empty());
        assert_eq!(chart.after_title(0), None);
        assert_eq!(chart.click_target(&[ActiveElement { index: 0 }]), None);
    }

    #[test]
    fn test_short_commit_id() {
        assert_eq!(short_commit_id("abcdef1234"), "abcdef1");
        assert_eq!(short_commit_id("abc"), "abc");
        assert_eq!(short_commit_id(""), "");
        assert_eq!(short_commit_id("ääääääääää"), "äääääää");

        for record in HistoryIndex::build(&parse_feed()).get("parse").unwrap() {
            let short = short_commit_id(&record.commit.id);
            assert_eq!(short.chars().count(), 7);
            assert!(record.commit.id.starts_with(&short));
        }
    }

    #[test]
    fn test_tooltip_hooks() {
        let mut feed = parse_feed();
        {
            let bench = &mut feed.entries.benchmark[0].benches[0];
            bench.range = Some("± 0.5".to_string());
            bench.extra = Some("100 samples".to_string());
        }
        let index = HistoryIndex::build(&feed);
        let chart = ChartBuilder::new("parse", index.get("parse").unwrap()).build();

        assert_eq!(
            chart.after_title(0),
            Some("\ncommit abcdef1234\n\n2023-11-14T22:13:20Z committed by @web-flow\n")
        );
        assert_eq!(chart.label(0, "10").as_deref(), Some("10 ms (± 0.5)"));
        assert_eq!(chart.label(1, "12").as_deref(), Some("12 ms"));
        assert_eq!(chart.after_label(0), Some("\n100 samples"));
        assert_eq!(chart.after_label(1), Some(""));
        assert_eq!(chart.label(2, "x"), None);
    }

    #[test]
    fn test_tooltip_labels_use_axis_label() {
        let mut feed = parse_feed();
        feed.entries.benchmark[1].benches[0].range = Some("± 2".to_string());
        let index = HistoryIndex::build(&feed);
        let chart = ChartBuilder::new("parse", index.get("parse").unwrap()).build();

        assert_eq!(chart.tooltip_labels(), vec!["abcdef1 ms", "0987654 ms (± 2)"]);
        assert!(ChartBuilder::new("parse", &[]).build().tooltip_labels().is_empty());
    }

    #[test]
    fn test_serializes_to_chartjs_shape() {
        let json = serde_json::to_value(parse_chart()).unwrap();

        assert_eq!(
            json["data"],
            serde_json::json!({
                "labels": ["abcdef1", "0987654"],
                "datasets": [{
                    "label": "parse",
                    "data": [10.0, 12.0],
                    "borderColor": "#dea584",
                    "backgroundColor": "#dea58460"
                }]
            })
        );
        assert_eq!(
            json["options"]["scales"],
            serde_json::json!({
                "x": { "title": { "display": true, "text": "commit" } },
                "y": { "title": { "display": true, "text": "ms" }, "beginAtZero": true }
            })
        );
        assert_eq!(json["tooltips"][1]["labelSuffix"], " ms");
        assert_eq!(
            json["commitUrls"][1],
            "https://github.com/swc-project/swc/commit/0987654321"
        );
    }
}
