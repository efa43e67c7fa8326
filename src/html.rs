//! Standalone HTML page hosting the benchmark chart with Chart.js

use crate::chart::{ChartBuilder, ChartConfig};
use crate::error::{Error, Result};
use crate::feed::FeedDocument;
use crate::index::HistoryIndex;
use minijinja::{context, Environment};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The `.html` name turns on minijinja's HTML auto-escaping
const TEMPLATE_NAME: &str = "index.html";

/// HTML template for the benchmark page
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            margin: 0 auto;
            max-width: 1200px;
            padding: 2rem;
        }

        .top {
            display: flex;
            justify-content: space-between;
            align-items: center;
            gap: 1rem;
            margin-bottom: 1rem;
        }

        .no-data {
            text-align: center;
            padding: 3rem;
            color: #6e7681;
        }
    </style>
</head>
<body>
    <h1>{{ title }}</h1>

    {% if test_cases %}
    <div class="top">
        <span>Last updated: {{ last_update }}</span>
        <select id="test-case">
            {% for name in test_cases %}
            <option value="{{ name }}">{{ name }}</option>
            {% endfor %}
        </select>
    </div>
    <canvas id="benchmark-chart"></canvas>
    {% else %}
    <div class="no-data">
        <p>No benchmark data available yet.</p>
    </div>
    {% endif %}

    <script>
        window.BENCHMARK_CHARTS = {{ charts_json | safe }};

        document.addEventListener('DOMContentLoaded', function() {
            const charts = window.BENCHMARK_CHARTS;
            const canvas = document.getElementById('benchmark-chart');
            const select = document.getElementById('test-case');
            if (!canvas || !select) return;

            let chart = null;

            function show(name) {
                const cfg = charts[name];
                if (!cfg) return;
                if (chart) chart.destroy();

                const options = Object.assign({}, cfg.options, {
                    plugins: {
                        tooltip: {
                            callbacks: {
                                afterTitle: function(items) {
                                    return cfg.tooltips[items[0].dataIndex].afterTitle;
                                },
                                label: function(item) {
                                    return item.label + cfg.tooltips[item.dataIndex].labelSuffix;
                                },
                                afterLabel: function(item) {
                                    return cfg.tooltips[item.dataIndex].afterLabel;
                                }
                            }
                        }
                    },
                    onClick: function(_event, elements) {
                        if (elements.length !== 0) {
                            window.open(cfg.commitUrls[elements[0].index], '_blank');
                        }
                    }
                });

                chart = new Chart(canvas, { type: 'line', data: cfg.data, options: options });
            }

            select.addEventListener('change', function(e) { show(e.target.value); });
            show(select.value);
        });
    </script>
</body>
</html>
"#;

/// Page configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Page title
    pub title: String,
    /// Output directory, relative to the base path
    pub output_dir: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Benchmark History".to_string(),
            output_dir: "dev/bench".to_string(),
        }
    }
}

/// Chart configuration for every test case, keyed by name
fn build_charts(index: &HistoryIndex) -> BTreeMap<&str, ChartConfig> {
    index
        .iter()
        .map(|(name, records)| (name, ChartBuilder::new(name, records).build()))
        .collect()
}

/// JSON safe to inline inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\uXXXX` forms
/// decode to the same text but cannot open or close markup.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Render the page for an index
pub fn generate_page(index: &HistoryIndex, config: &PageConfig) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, PAGE_TEMPLATE)?;

    let template = env.get_template(TEMPLATE_NAME)?;

    let charts = build_charts(index);
    debug!("Rendering page with {} charts", charts.len());

    let last_update = index
        .last_update()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    let html = template.render(context! {
        title => &config.title,
        last_update => last_update,
        test_cases => index.keys(),
        charts_json => script_json(&charts)?,
    })?;

    Ok(html)
}

/// Write `index.html` and the raw feed into the configured output directory.
///
/// Returns the path of the written page.
pub fn write_page(feed: &FeedDocument, config: &PageConfig, base_path: &Path) -> Result<PathBuf> {
    let output_dir = base_path.join(&config.output_dir);
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let index = HistoryIndex::build(feed);
    let html = generate_page(&index, config)?;

    let index_path = output_dir.join("index.html");
    std::fs::write(&index_path, html).map_err(|e| Error::FileWriteError {
        path: index_path.display().to_string(),
        source: e,
    })?;

    feed.save_to_file(&output_dir.join("benchmark-data.json"))?;

    Ok(index_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::{bench, entry, feed, parse_feed};

    #[test]
    fn test_generate_page_empty() {
        let index = HistoryIndex::build(&feed(Vec::new()));
        let html = generate_page(&index, &PageConfig::default()).unwrap();

        assert!(html.contains("No benchmark data available"));
        assert!(!html.contains("<select"));
    }

    #[test]
    fn test_generate_page_with_data() {
        let index = HistoryIndex::build(&feed(vec![
            entry("abcdef1234", 1, vec![bench("parse", 10.0), bench("minify", 5.0)]),
            entry("0987654321", 2, vec![bench("parse", 12.0)]),
        ]));
        let config = PageConfig {
            title: "SWC Benchmarks".to_string(),
            ..Default::default()
        };

        let html = generate_page(&index, &config).unwrap();

        assert!(html.contains("<title>SWC Benchmarks</title>"));
        assert!(html.contains("Last updated: 2023-11-14 22:13:20 UTC"));
        assert!(html.contains(r#"<option value="parse">parse</option>"#));
        assert!(html.contains(r#"<option value="minify">minify</option>"#));
        assert!(html.contains(r#""labels":["abcdef1","0987654"]"#));
        assert!(html.contains(r##""borderColor":"#dea584""##));
        assert!(html.find("value=\"parse\"") < html.find("value=\"minify\""));
    }

    #[test]
    fn test_generate_page_escapes_content() {
        let mut feed = parse_feed();
        feed.entries.benchmark[0].commit.message = "</script><b>bold</b>".to_string();
        feed.entries.benchmark[0].benches[0].name = "a<b".to_string();

        let html = generate_page(&HistoryIndex::build(&feed), &PageConfig::default()).unwrap();

        assert!(!html.contains("</script><b>"));
        assert!(html.contains("\\u003c/script\\u003e\\u003cb\\u003ebold"));
        assert!(html.contains("a&lt;b"));
    }

    #[test]
    fn test_script_json_cannot_enter_markup() {
        let json = script_json(&serde_json::json!({ "m": "<!--<script> & </script>" })).unwrap();

        assert_eq!(
            json,
            r#"{"m":"\u003c!--\u003cscript\u003e \u0026 \u003c/script\u003e"}"#
        );
        assert!(!json.contains('<'));

        let decoded: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded["m"], "<!--<script> & </script>");
    }

    #[test]
    fn test_write_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let feed = parse_feed();

        let path = write_page(&feed, &PageConfig::default(), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("dev/bench/index.html"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("abcdef1"));

        let saved =
            FeedDocument::load_from_file(&dir.path().join("dev/bench/benchmark-data.json")).unwrap();
        assert_eq!(saved, feed);
    }

    #[test]
    fn test_write_page_publishes_whole_feed() {
        let json = r#"{
            "lastUpdate": 1700000000000,
            "repoUrl": "https://github.com/swc-project/swc",
            "entries": {
                "Benchmark": [{
                    "commit": {
                        "author": { "name": "A", "username": "a" },
                        "committer": { "name": "C", "username": "c" },
                        "id": "abcdef1234",
                        "message": "m",
                        "timestamp": "2023-11-14T22:13:20Z",
                        "url": "https://github.com/swc-project/swc/commit/abcdef1234"
                    },
                    "date": 1700000000000,
                    "tool": "cargo",
                    "benches": [{ "name": "parse", "value": 10, "unit": "ms" }]
                }],
                "Other suite": [{ "tool": "go", "benches": [] }]
            }
        }"#;
        let dir = tempfile::TempDir::new().unwrap();
        let feed = FeedDocument::from_json_str(json).unwrap();

        write_page(&feed, &PageConfig::default(), dir.path()).unwrap();

        let saved = std::fs::read_to_string(dir.path().join("dev/bench/benchmark-data.json")).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved["entries"]["Benchmark"][0]["tool"], "cargo");
        assert_eq!(saved["entries"]["Other suite"][0]["tool"], "go");
        assert_eq!(
            saved["entries"]["Benchmark"][0]["benches"][0]["value"],
            serde_json::json!(10)
        );
        assert_eq!(saved, serde_json::from_str::<serde_json::Value>(json).unwrap());
    }
}
