//! Report rendering
//!
//! Turns an [`AnalysisResult`] into either a sectioned text report or a JSON
//! document. Only the sections the run produced are rendered.

use anyhow::Result;
use colored::Colorize;
use finops_core::engine::{
    category_savings, ActionItem, CostBreakdownEntry, Forecast, GovernanceReport, OptimizationPlan,
    OptimizationRecommendation, VisibilityReport, WasteFinding, WasteReport, WasteTrigger,
};
use finops_core::{AnalysisResult, BottomLine};
use serde::Serialize;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

use crate::output::{color_compliance, color_priority, format_currency, format_percent, OutputFormat};

const RULE_WIDTH: usize = 70;

/// JSON document written for `--format json`
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    analysis: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    action_plan: Vec<ActionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bottom_line: Option<BottomLine>,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Monthly Cost")]
    cost: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Monthly Savings")]
    savings: String,
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Recommendation")]
    title: String,
    #[tabled(rename = "Monthly Savings")]
    savings: String,
    #[tabled(rename = "Effort")]
    effort: String,
    #[tabled(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Timeframe")]
    timeframe: String,
}

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    name: String,
    #[tabled(rename = "Month 3")]
    month_3: String,
    #[tabled(rename = "Month 6")]
    month_6: String,
    #[tabled(rename = "Month 12")]
    month_12: String,
    #[tabled(rename = "12-Month Total")]
    total: String,
}

#[derive(Tabled)]
struct ViolationRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Missing Tags")]
    missing: String,
}

/// Render a result in the requested format
///
/// `current_monthly_spend` feeds the bottom line, which is only produced
/// when waste or optimization ran.
pub fn render(
    result: &AnalysisResult,
    current_monthly_spend: f64,
    format: OutputFormat,
) -> Result<String> {
    let bottom_line = has_savings(result).then(|| result.bottom_line(current_monthly_spend));

    match format {
        OutputFormat::Json => {
            let report = JsonReport {
                analysis: result,
                action_plan: result.action_plan(),
                bottom_line,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Table => render_text(result, bottom_line.as_ref()),
    }
}

fn has_savings(result: &AnalysisResult) -> bool {
    result.waste.is_some() || result.optimization.is_some()
}

fn render_text(result: &AnalysisResult, bottom_line: Option<&BottomLine>) -> Result<String> {
    let mut out = String::new();
    let meta = &result.metadata;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", "FinOps Cost Analysis Report".bold())?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Account:    {}", meta.account_id.cyan())?;
    writeln!(out, "Region:     {}", meta.region)?;
    writeln!(out, "Collected:  {}", meta.collected_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Generated:  {}", meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;

    if let Some(visibility) = &result.visibility {
        render_visibility(&mut out, visibility)?;
    }
    if let Some(waste) = &result.waste {
        render_waste(&mut out, waste)?;
    }
    if let Some(plan) = &result.optimization {
        render_optimization(&mut out, plan)?;
    }
    if let Some(forecast) = &result.forecast {
        render_forecast(&mut out, forecast)?;
    }
    if let Some(governance) = &result.governance {
        render_governance(&mut out, governance)?;
    }

    let actions = result.action_plan();
    if !actions.is_empty() {
        render_action_plan(&mut out, &actions)?;
    }
    if let Some(bottom_line) = bottom_line {
        render_bottom_line(&mut out, bottom_line)?;
    }

    Ok(out)
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_visibility(out: &mut String, report: &VisibilityReport) -> Result<()> {
    section(out, "Cost Visibility")?;
    writeln!(
        out,
        "Total monthly cost: {}",
        format_currency(report.total_monthly_cost).bold()
    )?;

    let groups = [
        ("By service", &report.by_service),
        ("By team", &report.by_team),
        ("By environment", &report.by_environment),
    ];
    for (label, entries) in groups {
        if entries.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{}", label)?;
        writeln!(out, "{}", table(breakdown_rows(entries)))?;
    }
    writeln!(out)?;
    Ok(())
}

fn breakdown_rows(entries: &[CostBreakdownEntry]) -> Vec<BreakdownRow> {
    entries
        .iter()
        .map(|e| BreakdownRow {
            name: e.name.clone(),
            cost: format_currency(e.cost),
            share: format_percent(e.percentage),
        })
        .collect()
}

fn render_waste(out: &mut String, report: &WasteReport) -> Result<()> {
    section(out, "Waste Detection")?;

    if report.total_items == 0 {
        writeln!(out, "{}", "No waste found".green())?;
        writeln!(out)?;
        return Ok(());
    }

    let c = &report.categories;
    let categories = [
        ("Idle EC2 instances", &c.idle_compute),
        ("Unattached EBS volumes", &c.orphaned_volumes),
        ("Old snapshots", &c.aged_snapshots),
        ("Unused Elastic IPs", &c.unused_addresses),
        ("Idle RDS databases", &c.idle_databases),
    ];
    let summary: Vec<CategoryRow> = categories
        .iter()
        .map(|&(category, findings)| CategoryRow {
            category,
            items: findings.len(),
            savings: format_currency(category_savings(findings)),
        })
        .collect();
    writeln!(out, "{}", table(summary))?;
    writeln!(out)?;

    let rows: Vec<FindingRow> = c.findings().map(finding_row).collect();
    writeln!(out, "{}", table(rows))?;
    writeln!(out)?;

    writeln!(
        out,
        "Total waste: {} items, {}/month ({}/year)",
        report.total_items,
        format_currency(report.total_monthly_savings).yellow().bold(),
        format_currency(report.total_annual_savings)
    )?;
    writeln!(out)?;
    Ok(())
}

fn finding_row(finding: &WasteFinding) -> FindingRow {
    let reason = match finding.trigger {
        WasteTrigger::LowUtilization { cpu_avg } => format!("CPU {:.1}%", cpu_avg),
        WasteTrigger::Unattached => "unattached".to_string(),
        WasteTrigger::Age { days } => format!("{} days old", days),
    };
    FindingRow {
        resource: finding.resource_id.clone(),
        kind: finding.kind.to_string(),
        resource_type: finding.resource_type.clone(),
        reason,
        monthly: format_currency(finding.monthly_cost),
        priority: finding.priority.to_string(),
    }
}

fn render_optimization(out: &mut String, plan: &OptimizationPlan) -> Result<()> {
    section(out, "Optimization Opportunities")?;

    let tiers = [
        ("Quick wins (0-30 days)", &plan.quick_wins),
        ("Medium term (30-90 days)", &plan.medium_term),
        ("Long term (90+ days)", &plan.long_term),
    ];
    for (label, recommendations) in tiers {
        writeln!(out, "{}", label)?;
        if recommendations.is_empty() {
            writeln!(out, "  {}", "none".dimmed())?;
        } else {
            writeln!(out, "{}", table(recommendation_rows(recommendations)))?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Total potential savings: {}/month ({}/year)",
        format_currency(plan.total_potential_savings).green().bold(),
        format_currency(plan.total_annual_impact)
    )?;
    writeln!(out)?;
    Ok(())
}

fn recommendation_rows(recommendations: &[OptimizationRecommendation]) -> Vec<RecommendationRow> {
    recommendations
        .iter()
        .map(|r| RecommendationRow {
            title: r.title.clone(),
            savings: format_currency(r.monthly_savings),
            effort: r.effort.to_string(),
            impact: r.impact.to_string(),
            timeframe: r.timeframe.clone(),
        })
        .collect()
}

fn render_forecast(out: &mut String, forecast: &Forecast) -> Result<()> {
    section(out, &format!("Cost Forecast ({} months)", forecast.months))?;
    writeln!(
        out,
        "Current monthly: {}",
        format_currency(forecast.current_monthly)
    )?;

    let rows: Vec<ScenarioRow> = forecast
        .scenarios
        .iter()
        .map(|s| ScenarioRow {
            name: s.name.clone(),
            month_3: format_currency(s.month_3),
            month_6: format_currency(s.month_6),
            month_12: format_currency(s.month_12),
            total: format_currency(s.year_total),
        })
        .collect();
    writeln!(out, "{}", table(rows))?;
    writeln!(out)?;
    Ok(())
}

fn render_governance(out: &mut String, report: &GovernanceReport) -> Result<()> {
    section(out, "Tag Governance")?;
    writeln!(out, "Tag compliance:      {}", color_compliance(report.tag_compliance))?;
    writeln!(out, "Compliant resources: {}", report.compliant_resources)?;
    writeln!(out, "Untagged resources:  {}", report.untagged_resources)?;

    if !report.violations.is_empty() {
        writeln!(out)?;
        let rows: Vec<ViolationRow> = report
            .violations
            .iter()
            .map(|v| ViolationRow {
                resource_type: v.resource_type.to_string(),
                resource: v.resource_id.clone(),
                missing: v.missing_tags.join(", "),
            })
            .collect();
        writeln!(out, "{}", table(rows))?;
        if report.untagged_resources > report.violations.len() {
            writeln!(
                out,
                "{}",
                format!(
                    "... and {} more",
                    report.untagged_resources - report.violations.len()
                )
                .dimmed()
            )?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn render_action_plan(out: &mut String, actions: &[ActionItem]) -> Result<()> {
    section(out, "Prioritized Action Plan")?;
    for (i, action) in actions.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. [{}] {} - {}/month",
            i + 1,
            color_priority(action.priority),
            action.title,
            format_currency(action.monthly_savings)
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn render_bottom_line(out: &mut String, bottom: &BottomLine) -> Result<()> {
    section(out, "Bottom Line")?;
    writeln!(out, "Current monthly spend:   {}", format_currency(bottom.current_monthly_spend))?;
    writeln!(out, "Identified waste:        {}", format_currency(bottom.identified_waste))?;
    writeln!(out, "Optimization potential:  {}", format_currency(bottom.optimization_potential))?;
    writeln!(
        out,
        "Total monthly savings:   {}",
        format_currency(bottom.total_monthly_savings).green().bold()
    )?;
    writeln!(out, "Annual impact:           {}", format_currency(bottom.total_annual_impact))?;
    writeln!(
        out,
        "Optimized monthly spend: {} ({} reduction)",
        format_currency(bottom.optimized_monthly_spend),
        format_percent(bottom.reduction_percent)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finops_core::demo::demo_dataset;
    use finops_core::{AnalysisConfig, AnalysisRequest, Analyzer};

    fn demo_result(request: AnalysisRequest) -> (AnalysisResult, f64) {
        let dataset = demo_dataset("us-east-1");
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let result = analyzer.run(&dataset, &request).unwrap();
        (result, dataset.total_monthly_cost)
    }

    #[test]
    fn test_text_report_has_requested_sections() {
        colored::control::set_override(false);
        let (result, spend) = demo_result(AnalysisRequest::full().with_forecast(12));
        let text = render(&result, spend, OutputFormat::Table).unwrap();

        assert!(text.contains("DEMO-123456789"));
        assert!(text.contains("Cost Visibility"));
        assert!(text.contains("Waste Detection"));
        assert!(text.contains("Optimization Opportunities"));
        assert!(text.contains("Cost Forecast (12 months)"));
        assert!(text.contains("Tag Governance"));
        assert!(text.contains("Prioritized Action Plan"));
        assert!(text.contains("Bottom Line"));
        assert!(text.contains("$45,234.50"));
    }

    #[test]
    fn test_governance_only_report_has_no_bottom_line() {
        colored::control::set_override(false);
        let request = AnalysisRequest {
            governance: true,
            ..AnalysisRequest::default()
        };
        let (result, spend) = demo_result(request);
        let text = render(&result, spend, OutputFormat::Table).unwrap();

        assert!(text.contains("Tag Governance"));
        assert!(!text.contains("Waste Detection"));
        assert!(!text.contains("Bottom Line"));
    }

    #[test]
    fn test_json_report_parses() {
        let (result, spend) = demo_result(AnalysisRequest::full());
        let json = render(&result, spend, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["account_id"], "DEMO-123456789");
        assert_eq!(value["waste"]["total_items"], 10);
        assert_eq!(value["action_plan"].as_array().unwrap().len(), 5);
        assert!(value["bottom_line"]["total_monthly_savings"].as_f64().unwrap() > 0.0);
        assert!(value.get("forecast").is_none());
    }
}
