//! Output formatting utilities
//!
//! Plans go to stdout; status messages go to stderr so that JSON output
//! stays machine-readable.

use colored::Colorize;
use diagnosis_lib::{RankClass, RuleCatalog};
use tabled::{settings::Style, Table, Tabled};

/// Row for the catalog rules table
#[derive(Tabled)]
pub struct RuleRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Trigger")]
    pub trigger: String,
    #[tabled(rename = "Rank")]
    pub rank: String,
    #[tabled(rename = "Templates")]
    pub templates: usize,
    #[tabled(rename = "Conditional")]
    pub conditional: usize,
    #[tabled(rename = "Boundary")]
    pub boundary: String,
}

/// Row for the standards table
#[derive(Tabled)]
pub struct StandardRow {
    #[tabled(rename = "Standard")]
    pub name: String,
    #[tabled(rename = "Version")]
    pub version: String,
    #[tabled(rename = "As Of")]
    pub as_of: String,
}

pub fn rule_rows(catalog: &RuleCatalog) -> Vec<RuleRow> {
    catalog
        .rules()
        .iter()
        .enumerate()
        .map(|(position, rule)| RuleRow {
            position: position + 1,
            trigger: rule.trigger.to_string(),
            rank: color_rank(rule.trigger.rank_class()),
            templates: rule.templates.len(),
            conditional: rule
                .templates
                .iter()
                .filter(|t| t.when.is_some() || t.escalation.is_some())
                .count(),
            boundary: if rule.boundary.is_some() { "yes" } else { "-" }.to_string(),
        })
        .collect()
}

pub fn standard_rows(catalog: &RuleCatalog) -> Vec<StandardRow> {
    catalog
        .standards()
        .iter()
        .map(|s| StandardRow {
            name: s.name.clone(),
            version: s.version.clone(),
            as_of: s.as_of.to_string(),
        })
        .collect()
}

/// Print a table from a list of rows
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a rank class by how urgent it is
pub fn color_rank(rank: RankClass) -> String {
    let label = match rank {
        RankClass::Compliance => "compliance",
        RankClass::Budget => "budget",
        RankClass::CompanySize => "company-size",
        RankClass::SystemType => "system-type",
    };
    match rank {
        RankClass::Compliance => label.red().to_string(),
        RankClass::Budget => label.yellow().to_string(),
        RankClass::CompanySize => label.blue().to_string(),
        RankClass::SystemType => label.to_string(),
    }
}
