//! Plan rendering
//!
//! Two output formats are supported:
//! - `text`: sectioned, human-readable report
//! - `json`: the full [`DiagnosisPlan`] with stable camelCase keys
//!
//! Rendering never reorders or alters the plan.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::error::RenderError;
use crate::models::{DiagnosisPlan, Phase};

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Render a plan in the requested format
pub fn render(plan: &DiagnosisPlan, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => render_text(plan),
        OutputFormat::Json => render_json(plan),
    }
}

pub fn render_json(plan: &DiagnosisPlan) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(plan)?)
}

pub fn render_text(plan: &DiagnosisPlan) -> Result<String, RenderError> {
    let mut out = String::new();
    write_summary(&mut out, plan)?;
    write_signals(&mut out, plan)?;
    write_ranked(&mut out, plan)?;
    write_phases(&mut out, plan)?;
    write_list(&mut out, "Track These Unit Metrics", &plan.tracked_metrics)?;
    write_list(&mut out, "Practices", &plan.practices)?;
    write_list(&mut out, "Guardrails", &plan.guardrails)?;
    write_list(&mut out, "Country & Residency Notes", &plan.policy_boundaries)?;
    write_standards(&mut out, plan)?;
    Ok(out)
}

fn heading(out: &mut String, title: &str) -> fmt::Result {
    if !out.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn write_summary(out: &mut String, plan: &DiagnosisPlan) -> fmt::Result {
    heading(out, "Cost Diagnosis")?;
    writeln!(out, "Catalog version: {}", plan.catalog_version)?;
    writeln!(
        out,
        "Budget tier: {} (monthly budget ${:.2})",
        plan.tiers.budget, plan.profile.monthly_budget_usd
    )?;
    writeln!(out, "Company size tier: {}", plan.tiers.company_size)?;

    let modifiers = if plan.modifiers.is_empty() {
        "none".to_string()
    } else {
        plan.modifiers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(out, "Modifiers: {}", modifiers)?;
    if let Some(country) = &plan.profile.country {
        writeln!(out, "Country: {}", country)?;
    }

    let summary = &plan.summary;
    writeln!(
        out,
        "Requests per compute hour: {}",
        optional(summary.requests_per_compute_hour)
    )?;
    writeln!(
        out,
        "Egress MB per 1K requests: {}",
        optional(summary.egress_mb_per_1k_requests)
    )?;
    writeln!(
        out,
        "Cost per 1M requests (USD): {}",
        optional(summary.cost_per_1m_requests_usd)
    )
}

fn write_signals(out: &mut String, plan: &DiagnosisPlan) -> fmt::Result {
    heading(out, "Risk Signals")?;
    if plan.summary.signals.is_empty() {
        return writeln!(out, "  (none detected)");
    }
    for signal in &plan.summary.signals {
        writeln!(out, "- {}", signal)?;
    }
    Ok(())
}

fn write_ranked(out: &mut String, plan: &DiagnosisPlan) -> fmt::Result {
    heading(out, "Ranked Actions")?;
    if plan.recommendations.is_empty() {
        return writeln!(out, "  (no recommendations)");
    }
    for (rank, rec) in plan.recommendations.iter().enumerate() {
        let phase = rec
            .phase
            .map_or_else(|| "unplanned".to_string(), |p| p.to_string());
        writeln!(
            out,
            "{}. {} [{} | {} | score {} | {}]",
            rank + 1,
            rec.action,
            rec.domain,
            rec.direction,
            rec.priority,
            phase
        )?;
        for line in &rec.rationale {
            writeln!(out, "   > {}", line)?;
        }
    }
    Ok(())
}

fn write_phases(out: &mut String, plan: &DiagnosisPlan) -> fmt::Result {
    heading(out, "90-Day Plan")?;
    for phase in Phase::ALL {
        let title = match phase {
            Phase::Immediate => "Immediate",
            Phase::MediumTerm => "Medium-term",
            Phase::FollowUp => "Follow-up",
        };
        writeln!(out, "{} ({}):", title, phase.window())?;
        let actions = plan.phases.actions(phase);
        if actions.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for action in actions {
            writeln!(out, "- {}", action)?;
        }
    }
    Ok(())
}

fn write_list(out: &mut String, title: &str, items: &[String]) -> fmt::Result {
    heading(out, title)?;
    if items.is_empty() {
        return writeln!(out, "  (none)");
    }
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    Ok(())
}

fn write_standards(out: &mut String, plan: &DiagnosisPlan) -> fmt::Result {
    heading(out, "Standards Referenced")?;
    if plan.standards.is_empty() {
        return writeln!(out, "  (none)");
    }
    for standard in &plan.standards {
        write!(
            out,
            "- {} {} (as of {})",
            standard.name, standard.version, standard.as_of
        )?;
        match &standard.url {
            Some(url) => writeln!(out, ": {}", url)?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);

        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ref f) if f == "yaml"));
        assert!(err.to_string().contains("text|json"));
    }

    #[test]
    fn test_heading_underline_matches_title() {
        let mut out = String::new();
        heading(&mut out, "Guardrails").unwrap();
        assert_eq!(out, "Guardrails\n----------\n");

        heading(&mut out, "90-Day Plan").unwrap();
        assert!(out.ends_with("\n\n90-Day Plan\n-----------\n"));
    }

    #[test]
    fn test_practices_render_before_guardrails() {
        let raw = crate::validator::RawProfile {
            monthly_budget_usd: Some(500.0),
            ..Default::default()
        };
        let catalog = crate::catalog::RuleCatalog::builtin().unwrap();
        let plan = crate::pipeline::diagnose_raw(&raw, &catalog).unwrap();
        let text = render_text(&plan).unwrap();

        let practices = text.find("\nPractices\n").unwrap();
        let guardrails = text.find("\nGuardrails\n").unwrap();
        assert!(practices < guardrails);
        for practice in &plan.practices {
            assert!(text[practices..guardrails].contains(practice.as_str()));
        }
    }

    #[test]
    fn test_empty_list_placeholder() {
        let mut out = String::new();
        write_list(&mut out, "Guardrails", &[]).unwrap();
        assert!(out.contains("(none)"));
        assert!(!out.contains("- "));
    }
}
