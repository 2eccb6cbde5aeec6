//! Example: converting a rule book to the authoring surface's node graph
//! and back, showing the single-constraint split.
//! Run with: cargo run --example rule_graph [rules.json]

use panelguard::{load_rules_str, node_graph_to_rules, rules_to_node_graph};

fn main() -> Result<(), panelguard::PanelGuardError> {
    let rules_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/rules.json".to_string());

    let book = load_rules_str(&std::fs::read_to_string(&rules_path)?)?;
    let graph = rules_to_node_graph(&book.rules, &[]);

    println!(
        "{} rule(s) -> {} node(s), {} edge(s)",
        book.rules.len(),
        graph.nodes.len(),
        graph.edges.len()
    );
    for node in &graph.nodes {
        println!("  {}", node.id);
    }

    let restored = node_graph_to_rules(&graph, &[]);
    println!("round trip -> {} rule(s)", restored.len());
    for rule in &restored {
        println!("  {} ({})", rule.id, rule.name);
    }
    Ok(())
}
