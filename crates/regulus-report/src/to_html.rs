// Regulus Report - Benchmark log reporting pipeline
//
// Copyright (c) 2025 Regulus contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Self-contained HTML summary page.
//!
//! The page carries its stylesheet and the row filter script inline, so a
//! single file can be archived or mailed as is.

use crate::document::RunMetadata;
use crate::error::Result;
use crate::generator::OutputGenerator;
use crate::table::{build_table, Table};
use regulus_core::{FileReport, ProcessingStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Configuration for HTML output.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Page title and heading
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: "Regulus Performance Report Summary".to_string(),
        }
    }
}

/// Writes the HTML summary page.
#[derive(Debug, Clone, Default)]
pub struct HtmlOutputGenerator {
    config: HtmlConfig,
}

impl HtmlOutputGenerator {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }
}

impl OutputGenerator for HtmlOutputGenerator {
    fn extension(&self) -> &str {
        "html"
    }

    fn render(&self, reports: &[FileReport], meta: &RunMetadata) -> Result<String> {
        let stats = SummaryStats::collect(reports);
        let title = escape(&self.config.title);

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str("<style>\n");
        html.push_str(include_str!("assets/report.css"));
        html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

        push_header(&mut html, &title, meta, &stats);
        push_summary_cards(&mut html, &stats);

        let mut groups: BTreeMap<&str, Vec<&FileReport>> = BTreeMap::new();
        for report in reports {
            groups.entry(report.benchmark.as_str()).or_default().push(report);
        }
        for (benchmark, group) in &groups {
            push_benchmark_section(&mut html, benchmark, group);
        }

        html.push_str("<section class=\"detailed-results\">\n");
        html.push_str("<h2>Detailed Results (All Iterations)</h2>\n");
        let statuses = row_statuses(reports.iter());
        push_table(&mut html, &build_table(reports, None), &statuses);
        html.push_str("</section>\n");

        html.push_str(&format!(
            "<footer class=\"footer\">Generated by regulus-report {} at {}</footer>\n",
            env!("CARGO_PKG_VERSION"),
            escape(&meta.timestamp)
        ));
        html.push_str("</div>\n<script>\n");
        html.push_str(include_str!("assets/filter.js"));
        html.push_str("</script>\n</body>\n</html>\n");
        Ok(html)
    }
}

/// Page-level counts.
#[derive(Debug, Clone, PartialEq)]
struct SummaryStats {
    total_files: usize,
    total_iterations: usize,
    successful: usize,
    /// Percentage, 0 for no files
    success_rate: f64,
    benchmark_count: usize,
    kernel: String,
    rcos: String,
}

impl SummaryStats {
    fn collect(reports: &[FileReport]) -> Self {
        let successful = reports
            .iter()
            .filter(|r| r.status() == ProcessingStatus::Success)
            .count();
        let benchmarks: BTreeSet<&str> = reports.iter().map(|r| r.benchmark.as_str()).collect();
        Self {
            total_files: reports.len(),
            total_iterations: reports.iter().map(|r| r.iterations.len()).sum(),
            successful,
            success_rate: percent(successful, reports.len()),
            benchmark_count: benchmarks.len(),
            kernel: joined_tag(reports, "kernel"),
            rcos: joined_tag(reports, "rcos"),
        }
    }

    fn rate_class(&self) -> &'static str {
        if self.success_rate > 90.0 {
            "success"
        } else if self.success_rate > 70.0 {
            "warning"
        } else {
            "danger"
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Distinct values of a key tag across files, or `Unknown`.
fn joined_tag(reports: &[FileReport], tag: &str) -> String {
    let values: BTreeSet<&str> = reports
        .iter()
        .filter_map(|r| r.key_tags.get(tag).map(String::as_str))
        .collect();
    if values.is_empty() {
        "Unknown".to_string()
    } else {
        values.into_iter().collect::<Vec<_>>().join(", ")
    }
}

fn push_header(html: &mut String, title: &str, meta: &RunMetadata, stats: &SummaryStats) {
    html.push_str("<header class=\"header\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str(&format!(
        "<p class=\"subtitle\">Generated on {}</p>\n",
        escape(&meta.timestamp)
    ));
    html.push_str(&format!(
        "<p class=\"subtitle\">Kernel: {} | RCOS: {}</p>\n",
        escape(&stats.kernel),
        escape(&stats.rcos)
    ));
    if let Some(label) = &meta.execution_label {
        html.push_str(&format!("<p class=\"subtitle\">Execution: {}</p>\n", escape(label)));
    }
    html.push_str("<div class=\"filter-box\">\n");
    html.push_str("<label for=\"filterInput\">Filter by Regex Pattern:</label>\n");
    html.push_str(
        "<input type=\"text\" id=\"filterInput\" placeholder=\"e.g., tcp|udp or ^stream\">\n",
    );
    html.push_str("<button type=\"button\" onclick=\"clearFilter()\">Clear</button>\n");
    html.push_str("<div id=\"matchCount\"></div>\n</div>\n</header>\n");
}

fn push_card(html: &mut String, class: &str, heading: &str, metric: &str, detail: &str) {
    html.push_str(&format!(
        "<div class=\"card {}\">\n<h3>{}</h3>\n<div class=\"metric\">{}</div>\n<div class=\"detail\">{}</div>\n</div>\n",
        class, heading, metric, detail
    ));
}

fn push_summary_cards(html: &mut String, stats: &SummaryStats) {
    html.push_str("<section class=\"summary-cards\">\n");
    push_card(
        html,
        "info",
        "Total Files",
        &stats.total_files.to_string(),
        "Files processed",
    );
    push_card(
        html,
        "info",
        "Total Iterations",
        &stats.total_iterations.to_string(),
        "Test iterations found",
    );
    push_card(
        html,
        stats.rate_class(),
        "Success Rate",
        &format!("{:.1}%", stats.success_rate),
        &format!("{}/{} successful", stats.successful, stats.total_files),
    );
    push_card(
        html,
        "neutral",
        "Benchmarks",
        &stats.benchmark_count.to_string(),
        "Different types found",
    );
    html.push_str("</section>\n");
}

fn push_benchmark_section(html: &mut String, benchmark: &str, group: &[&FileReport]) {
    let successful = group
        .iter()
        .filter(|r| r.status() == ProcessingStatus::Success)
        .count();
    let iterations: usize = group.iter().map(|r| r.iterations.len()).sum();

    html.push_str("<section class=\"benchmark-section\">\n");
    html.push_str(&format!("<h2>{} Benchmark</h2>\n", escape(&title_case(benchmark))));
    html.push_str("<div class=\"benchmark-stats\">\n");
    html.push_str(&format!("<span class=\"stat\">Files: {}</span>\n", group.len()));
    html.push_str(&format!("<span class=\"stat\">Iterations: {}</span>\n", iterations));
    html.push_str(&format!(
        "<span class=\"stat\">Success: {}/{}</span>\n",
        successful,
        group.len()
    ));
    html.push_str(&format!(
        "<span class=\"stat\">Rate: {:.1}%</span>\n",
        percent(successful, group.len())
    ));
    html.push_str("</div>\n");

    let owned: Vec<FileReport> = group.iter().map(|r| (*r).clone()).collect();
    let table = build_table(&owned, None);
    if table.rows.is_empty() {
        html.push_str("<p>No metrics available</p>\n");
    } else {
        push_table(html, &table, &row_statuses(group.iter().copied()));
    }

    html.push_str("<details class=\"file-list\">\n");
    html.push_str(&format!(
        "<summary>Files in this benchmark ({})</summary>\n<ul>\n",
        group.len()
    ));
    for report in group {
        let count = report.iterations.len();
        html.push_str(&format!(
            "<li>{} <code>{}</code> <small>({} iteration{}, {})</small></li>\n",
            status_icon(report.status()),
            escape(report.file_name()),
            count,
            if count == 1 { "" } else { "s" },
            format_file_size(report.file_size)
        ));
    }
    html.push_str("</ul>\n</details>\n</section>\n");
}

/// One status per table row, following the row order of `build_table`.
fn row_statuses<'a>(reports: impl Iterator<Item = &'a FileReport>) -> Vec<ProcessingStatus> {
    reports
        .flat_map(|r| std::iter::repeat(r.status()).take(r.iterations.len()))
        .collect()
}

/// Render a filterable table. Columns empty in every row are left out.
fn push_table(html: &mut String, table: &Table, statuses: &[ProcessingStatus]) {
    let shown: Vec<usize> = (0..table.columns.len())
        .filter(|&i| table.rows.iter().any(|row| !row[i].is_empty()))
        .collect();

    html.push_str("<div class=\"table-container\">\n<table class=\"filterable\">\n<thead>\n<tr>");
    html.push_str("<th>#</th><th>Status</th>");
    for &i in &shown {
        html.push_str(&format!("<th>{}</th>", escape(&table.columns[i])));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for (n, row) in table.rows.iter().enumerate() {
        let status = statuses.get(n).copied().unwrap_or(ProcessingStatus::Skipped);
        html.push_str(&format!(
            "<tr><td class=\"row-number\">{}</td><td><span class=\"status-badge status-{}\">{}</span></td>",
            n + 1,
            status.as_str(),
            status.as_str()
        ));
        for &i in &shown {
            html.push_str(&format!("<td>{}</td>", escape(&row[i])));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</div>\n");
}

fn status_icon(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Success => "&#9989;",
        ProcessingStatus::Partial => "&#9888;",
        ProcessingStatus::Failed => "&#10060;",
        ProcessingStatus::Skipped => "&#10067;",
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human-readable byte count.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
