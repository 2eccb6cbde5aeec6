//! PanelGuard CLI - electrical panel design rule checking from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use panelguard::{
    load_combinator_library_str, load_component_library_str, load_design_str, load_rules_str,
    rejected_rule_violations, rules_to_node_graph, DrcReport, RuleViolation, Severity,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "panelguard")]
#[command(about = "Electrical panel design rule checking tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the design rule check over a design snapshot
    Check {
        /// Path to the design JSON (panels + placements)
        #[arg(value_name = "DESIGN")]
        design: PathBuf,

        /// Path to the rule book JSON
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,

        /// Path to the component library JSON
        #[arg(long, value_name = "FILE")]
        components: Option<PathBuf>,

        /// Path to the combinator library JSON
        #[arg(long, value_name = "FILE")]
        combinators: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if violations exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// Convert a rule book to the authoring surface's node graph
    Graph {
        /// Path to the rule book JSON
        #[arg(value_name = "RULES")]
        rules: PathBuf,

        /// Optional design JSON supplying panel names for scope labels
        #[arg(long, value_name = "FILE")]
        design: Option<PathBuf>,
    },

    /// List the constraint kinds understood by the evaluator
    Rules {
        /// Show detailed constraint descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            design,
            rules,
            components,
            combinators,
            format,
            fail_on,
        } => handle_check(
            &design,
            &rules,
            components.as_deref(),
            combinators.as_deref(),
            format,
            fail_on,
        ),
        Commands::Graph { rules, design } => handle_graph(&rules, design.as_deref()),
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn handle_check(
    design_path: &Path,
    rules_path: &Path,
    components_path: Option<&Path>,
    combinators_path: Option<&Path>,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
) -> i32 {
    let result = (|| -> Result<DrcReport, String> {
        let design = load_design_str(&read_file(design_path)?).map_err(|e| e.to_string())?;
        let book = load_rules_str(&read_file(rules_path)?).map_err(|e| e.to_string())?;
        let component_library = match components_path {
            Some(path) => {
                load_component_library_str(&read_file(path)?).map_err(|e| e.to_string())?
            }
            None => Vec::new(),
        };
        let combinator_library = match combinators_path {
            Some(path) => {
                load_combinator_library_str(&read_file(path)?).map_err(|e| e.to_string())?
            }
            None => Vec::new(),
        };

        let mut violations = rejected_rule_violations(&book.rejected);
        violations.extend(
            panelguard::run_drc(&book.rules, &design, &component_library, &combinator_library)
                .violations,
        );
        Ok(DrcReport::from_violations(violations))
    })();

    match result {
        Ok(report) => {
            output_report(&report, &format);
            if let Some(gate) = fail_on {
                if should_fail(&report, &gate) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(report: &DrcReport, gate: &FailOnSeverity) -> bool {
    match gate {
        FailOnSeverity::Error => report.has_errors(),
        FailOnSeverity::Warning => report.total_violations() > 0,
    }
}

fn output_report(report: &DrcReport, format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(report),
        OutputFormat::Json => output_json(report),
        OutputFormat::Github => output_github(report),
    }
}

fn output_human(report: &DrcReport) {
    println!("{}", "─".repeat(60));

    if report.total_violations() == 0 {
        println!("  No violations found");
        return;
    }

    let errors: Vec<&RuleViolation> = report
        .violations
        .iter()
        .filter(|v| matches!(v.severity, Severity::Error))
        .collect();
    let warnings: Vec<&RuleViolation> = report
        .violations
        .iter()
        .filter(|v| matches!(v.severity, Severity::Warning))
        .collect();

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for violation in errors {
            println!("    - [{}] {}", violation.rule_name, violation.message);
            if let Some(ref id) = violation.component_id {
                println!("      Component: {}", id);
            }
        }
    }
    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for violation in warnings {
            println!("    - [{}] {}", violation.rule_name, violation.message);
            if let Some(ref id) = violation.component_id {
                println!("      Component: {}", id);
            }
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", report.stats.errors);
    println!("    Warnings: {}", report.stats.warnings);
}

fn output_json(report: &DrcReport) {
    let output = serde_json::json!({
        "violations": report.violations,
        "stats": {
            "errors": report.stats.errors,
            "warnings": report.stats.warnings,
        },
        "total": report.total_violations(),
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn severity_to_github(violation: &RuleViolation) -> &'static str {
    match violation.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn output_github(report: &DrcReport) {
    for violation in &report.violations {
        println!(
            "::{} title={}::{}",
            severity_to_github(violation),
            violation.rule_name,
            violation.message.replace('\n', " ")
        );
    }
}

fn handle_graph(rules_path: &Path, design_path: Option<&Path>) -> i32 {
    let result = (|| -> Result<String, String> {
        let book = load_rules_str(&read_file(rules_path)?).map_err(|e| e.to_string())?;
        if !book.rejected.is_empty() {
            eprintln!(
                "Warning: {} malformed rule entr{} skipped",
                book.rejected.len(),
                if book.rejected.len() == 1 { "y" } else { "ies" }
            );
        }
        let panels = match design_path {
            Some(path) => {
                load_design_str(&read_file(path)?)
                    .map_err(|e| e.to_string())?
                    .panels
            }
            None => Vec::new(),
        };
        let graph = rules_to_node_graph(&book.rules, &panels);
        serde_json::to_string_pretty(&graph).map_err(|e| e.to_string())
    })();

    match result {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_rules(verbose: bool) {
    println!("Supported constraint kinds:\n");

    let kinds = [
        (
            "dimension",
            "Numeric property bounds",
            "Checks a named property (width, specs.current, ...) against min/max",
        ),
        (
            "count",
            "Matching component count",
            "Counts entities in scope against min/max or an exact value",
        ),
        (
            "spacing",
            "Pairwise clearance",
            "Edge-to-edge distance between placements on the same panel",
        ),
        (
            "co-usage",
            "Required companions",
            "Each placement of the target needs its required components on the panel",
        ),
        (
            "overlap",
            "Bounding-box overlap",
            "No two placements on a panel may intersect",
        ),
        (
            "bounds",
            "Panel bounds",
            "Placements must lie fully inside their panel",
        ),
        (
            "noIntersectWithPanelBounds",
            "Cross-panel intersection",
            "Placements must not reach into the listed panels",
        ),
        (
            "panelSizeMapping",
            "Panel size class",
            "specs.panelSize must match the owning panel's size class",
        ),
    ];

    for (name, short, long) in &kinds {
        println!("  {}", name);
        println!("    {}", short);
        if verbose {
            println!("    {}", long);
        }
        println!();
    }
}
