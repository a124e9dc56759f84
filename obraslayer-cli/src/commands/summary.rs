//! Summary of loaded datasets.

use std::collections::BTreeMap;

use obraslayer::mapper::ProjectStatus;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Print per-resource counts, status distribution and budget totals.
pub async fn run(runner: &CliRunner, keys: &[String]) -> Result<(), CliError> {
    let snapshot = runner.load(keys).await?;

    println!("Resources:");
    for (key, resource) in &snapshot.resources {
        println!(
            "  {:<36} [{}] {} units ({} located, {} skipped)",
            key,
            resource.source,
            resource.units.len(),
            resource.located_units().count(),
            resource.skipped
        );
    }
    for key in snapshot.errors.keys() {
        println!("  {:<36} (failed)", key);
    }

    let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
    let (mut budget, mut executed, mut paid) = (0.0, 0.0, 0.0);
    for unit in snapshot.units() {
        *by_status.entry(unit.status.label()).or_default() += 1;
        budget += unit.budget;
        executed += unit.executed;
        paid += unit.paid;
    }

    println!();
    println!("Status:");
    for status in ProjectStatus::ALL {
        let count = by_status.get(status.label()).copied().unwrap_or(0);
        println!("  {:<16} {}", status.label(), count);
    }

    println!();
    println!("Budget:");
    println!("  Base:      {}", format_amount(budget));
    println!("  Executed:  {}", format_amount(executed));
    println!("  Paid:      {}", format_amount(paid));

    Ok(())
}

/// `$ 1.234.567` with dot thousands separators, no decimals.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round().abs() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{}$ {}", sign, grouped)
}
