//! Bidirectional transform between the flat rule list (authoritative,
//! persisted) and the authoring surface's node graph.
//!
//! The forward direction is deterministic in its ID scheme; layout
//! positions are a presentation concern. The reverse direction synthesizes
//! one single-constraint rule per (scope, constraint-node) pair, which
//! splits multi-constraint rules — a known-odd behavior the authoring UI
//! depends on, preserved deliberately.

use std::collections::HashMap;

use crate::model::{Panel, Rule, RuleScope};

use super::{GraphEdge, GraphNode, NodePayload, NodePosition, RuleGraph, GLOBAL_SCOPE_ID};

const LANE_WIDTH: f64 = 340.0;
const ROW_HEIGHT: f64 = 140.0;
const CONDITION_INDENT: f64 = 180.0;
const CONDITION_ROW: f64 = 60.0;

/// Scope key of a rule in the graph, when it has one. Component- and
/// combinator-scoped rules have no graph representation: the authoring
/// surface edits panel lanes only.
fn scope_key(rule: &Rule) -> Option<&str> {
    match &rule.scope {
        RuleScope::Global => Some(GLOBAL_SCOPE_ID),
        RuleScope::Panel { panel_id } => Some(panel_id),
        RuleScope::Component { .. } | RuleScope::Combinator { .. } => None,
    }
}

/// Builds the three-tier node graph for a rule list. Node ids follow the
/// scheme `panel-{panelId}` / `constraint-{ruleId}-{i}` /
/// `condition-{ruleId}-{i}-{j}` and are deterministic for the same inputs.
pub fn rules_to_node_graph(rules: &[Rule], panels: &[Panel]) -> RuleGraph {
    let mut graph = RuleGraph::default();

    // Lanes in first-reference order.
    let mut lanes: Vec<&str> = Vec::new();
    for rule in rules {
        if let Some(key) = scope_key(rule) {
            if !lanes.contains(&key) {
                lanes.push(key);
            }
        }
    }

    for (lane, key) in lanes.iter().enumerate() {
        let scope_id = format!("panel-{}", key);
        let lane_x = lane as f64 * LANE_WIDTH;
        let label = if *key == GLOBAL_SCOPE_ID {
            "Global".to_string()
        } else {
            panels
                .iter()
                .find(|p| p.id == *key)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| key.to_string())
        };
        graph.nodes.push(GraphNode {
            id: scope_id.clone(),
            position: NodePosition { x: lane_x, y: 0.0 },
            payload: NodePayload::Scope {
                panel_id: key.to_string(),
                label,
            },
        });

        let mut row = 0usize;
        for rule in rules.iter().filter(|r| scope_key(r) == Some(*key)) {
            for (ci, constraint) in rule.constraints.iter().enumerate() {
                row += 1;
                let constraint_id = format!("constraint-{}-{}", rule.id, ci);
                graph.nodes.push(GraphNode {
                    id: constraint_id.clone(),
                    position: NodePosition {
                        x: lane_x,
                        y: row as f64 * ROW_HEIGHT,
                    },
                    payload: NodePayload::Constraint {
                        rule_id: rule.id.clone(),
                        rule_name: rule.name.clone(),
                        constraint: constraint.clone(),
                    },
                });
                graph.edges.push(GraphEdge {
                    id: format!("edge-{}-{}", scope_id, constraint_id),
                    source: scope_id.clone(),
                    target: constraint_id.clone(),
                });

                // Conditions are rule-level in the source schema; each
                // constraint node gets its own replica of the full set.
                for (di, condition) in rule.conditions.iter().enumerate() {
                    let condition_id = format!("condition-{}-{}-{}", rule.id, ci, di);
                    graph.nodes.push(GraphNode {
                        id: condition_id.clone(),
                        position: NodePosition {
                            x: lane_x + CONDITION_INDENT,
                            y: row as f64 * ROW_HEIGHT + (di + 1) as f64 * CONDITION_ROW,
                        },
                        payload: NodePayload::Condition {
                            rule_id: rule.id.clone(),
                            condition: condition.clone(),
                        },
                    });
                    graph.edges.push(GraphEdge {
                        id: format!("edge-{}-{}", constraint_id, condition_id),
                        source: constraint_id.clone(),
                        target: condition_id.clone(),
                    });
                }
            }
        }
    }

    graph
}

/// Reconstructs a rule list from a node graph. One rule is synthesized per
/// (scope, constraint-node) pair actually present — a multi-constraint rule
/// that was forward-mapped comes back as several single-constraint rules
/// with ids `rule-{panelId}-{constraintNodeId}`. Orphan constraint nodes
/// (no scope parent) are ignored; scope nodes without constraint children
/// produce nothing.
pub fn node_graph_to_rules(graph: &RuleGraph, _panels: &[Panel]) -> Vec<Rule> {
    let nodes: HashMap<&str, &GraphNode> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut rules = Vec::new();

    for scope_node in &graph.nodes {
        let NodePayload::Scope { panel_id, .. } = &scope_node.payload else {
            continue;
        };

        for edge in graph.edges.iter().filter(|e| e.source == scope_node.id) {
            let Some(child) = nodes.get(edge.target.as_str()) else {
                continue;
            };
            let NodePayload::Constraint {
                rule_name,
                constraint,
                ..
            } = &child.payload
            else {
                continue;
            };

            let conditions = graph
                .edges
                .iter()
                .filter(|e| e.source == child.id)
                .filter_map(|e| nodes.get(e.target.as_str()))
                .filter_map(|n| match &n.payload {
                    NodePayload::Condition { condition, .. } => Some(condition.clone()),
                    _ => None,
                })
                .collect();

            let scope = if panel_id == GLOBAL_SCOPE_ID {
                RuleScope::Global
            } else {
                RuleScope::Panel {
                    panel_id: panel_id.clone(),
                }
            };

            rules.push(Rule {
                id: format!("rule-{}-{}", panel_id, child.id),
                name: rule_name.clone(),
                scope,
                conditions,
                constraints: vec![constraint.clone()],
                dependencies: Vec::new(),
                enabled: true,
            });
        }
    }

    rules
}
