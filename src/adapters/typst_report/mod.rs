//! Typst report generation.
//!
//! Reads a Typst template (either the built-in default or a custom file),
//! resolves all `{{PLACEHOLDER}}` markers by calling helpers from
//! `chart_svg` and `tables`, and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use crate::adapters::console_report::format_analysis_period;
use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::error::RebalancerError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub analysis: &'a PortfolioAnalysis,
}

fn embed_svg(svg: &str, empty_message: &str) -> String {
    if svg.is_empty() {
        return empty_message.to_string();
    }
    format!(
        "#image(\n  bytes(\"{}\"),\n  format: \"svg\",\n  width: 100%,\n)",
        svg.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let analysis = ctx.analysis;
    let mut output = template.to_string();

    output = output.replace("{{TITLE}}", ctx.title);
    output = output.replace(
        "{{ANALYSIS_PERIOD}}",
        &format_analysis_period(analysis.analysis_period),
    );
    output = output.replace("{{SUMMARY_TABLE}}", &tables::render_summary_table(analysis));
    output = output.replace(
        "{{ALLOCATION_TABLE}}",
        &tables::render_allocation_table(&analysis.assets, analysis.weights.as_slice()),
    );

    let value_svg = chart_svg::generate_value_svg(&analysis.values);
    output = output.replace(
        "{{VALUE_CHART_SVG}}",
        &embed_svg(&value_svg, "_No value data._"),
    );

    let dd_svg = chart_svg::generate_drawdown_svg(&analysis.drawdowns);
    output = output.replace(
        "{{DRAWDOWN_CHART_SVG}}",
        &embed_svg(&dd_svg, "_No drawdown data._"),
    );

    let returns = tables::compute_period_returns(&analysis.values);
    output = output.replace(
        "{{PERIOD_RETURNS}}",
        &tables::format_returns_heatmap(&returns),
    );

    output = output.replace(
        "{{VALUE_TABLE}}",
        &tables::render_value_table(&analysis.values, &analysis.drawdowns),
    );

    output
}

pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
    title: String,
}

impl TypstReportAdapter {
    pub fn new(template_path: Option<PathBuf>) -> Self {
        Self {
            template_path,
            title: "Portfolio Rebalancing Report".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        analysis: &PortfolioAnalysis,
        output_path: &Path,
    ) -> Result<(), RebalancerError> {
        let custom;
        let template = match &self.template_path {
            Some(path) => {
                custom = fs::read_to_string(path).map_err(|e| RebalancerError::ConfigInvalid {
                    section: "report".into(),
                    key: "template_path".into(),
                    reason: format!("failed to read template {}: {}", path.display(), e),
                })?;
                custom.as_str()
            }
            None => default_template::template(),
        };

        let ctx = ReportContext {
            title: &self.title,
            analysis,
        };
        fs::write(output_path, resolve(template, &ctx))?;
        tracing::info!(path = %output_path.display(), "wrote Typst report");
        Ok(())
    }
}
