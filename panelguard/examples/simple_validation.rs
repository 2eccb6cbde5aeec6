//! Example: running the DRC over JSON files (design + rules + libraries).
//! Run with: cargo run --example simple_validation [design.json rules.json]

use panelguard::{
    load_component_library_str, load_design_str, load_rules_str, rejected_rule_violations,
    run_drc, DrcReport,
};
use std::path::Path;

fn main() -> Result<(), panelguard::PanelGuardError> {
    let mut args = std::env::args().skip(1);
    let design_path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/design.json".to_string());
    let rules_path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/rules.json".to_string());
    let components_path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/components.json".to_string());

    if !Path::new(&design_path).exists() || !Path::new(&rules_path).exists() {
        eprintln!("Usage: cargo run --example simple_validation [design.json rules.json components.json]");
        std::process::exit(1);
    }

    let design = load_design_str(&std::fs::read_to_string(&design_path)?)?;
    let book = load_rules_str(&std::fs::read_to_string(&rules_path)?)?;
    let library = match std::fs::read_to_string(&components_path) {
        Ok(json) => load_component_library_str(&json)?,
        Err(_) => Vec::new(),
    };

    let mut violations = rejected_rule_violations(&book.rejected);
    violations.extend(run_drc(&book.rules, &design, &library, &[]).violations);
    let report = DrcReport::from_violations(violations);

    println!(
        "DRC found {} violation(s) across {} panel(s)",
        report.total_violations(),
        design.panels.len()
    );
    for violation in &report.violations {
        println!("  [{:?}] {} - {}", violation.severity, violation.rule_name, violation.message);
        if let Some(ref id) = violation.component_id {
            println!("    Component: {}", id);
        }
    }

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
