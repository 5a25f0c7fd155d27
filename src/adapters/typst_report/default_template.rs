//! Built-in Typst report template.
//!
//! Every `{{PLACEHOLDER}}` below is resolved by [`super::resolve`]. Custom
//! templates may use any subset of them.

pub const PLACEHOLDERS: [&str; 8] = [
    "{{TITLE}}",
    "{{ANALYSIS_PERIOD}}",
    "{{SUMMARY_TABLE}}",
    "{{ALLOCATION_TABLE}}",
    "{{VALUE_CHART_SVG}}",
    "{{DRAWDOWN_CHART_SVG}}",
    "{{PERIOD_RETURNS}}",
    "{{VALUE_TABLE}}",
];

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: (x: 2cm, y: 2cm), numbering: "1")
#set text(size: 10pt)
#set table(stroke: 0.5pt + gray, inset: 5pt)

#align(center)[
  #text(size: 18pt, weight: "bold")[{{TITLE}}]

  #text(size: 11pt)[Analysis Period: {{ANALYSIS_PERIOD}}]
]

= Summary

{{SUMMARY_TABLE}}

= Allocation

{{ALLOCATION_TABLE}}

= Portfolio Value

{{VALUE_CHART_SVG}}

= Drawdown

{{DRAWDOWN_CHART_SVG}}

= Period Returns

{{PERIOD_RETURNS}}

#pagebreak()

= Value History

{{VALUE_TABLE}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_contains_every_placeholder() {
        for placeholder in PLACEHOLDERS {
            assert!(template().contains(placeholder), "missing {placeholder}");
        }
    }

    #[test]
    fn template_sets_up_page() {
        assert!(template().starts_with("#set page("));
    }
}
