//! Node-graph converter tests: deterministic ID scheme, the global
//! sentinel, condition fan-out, and the documented lossy round trip for
//! multi-constraint rules.

use panelguard::graph::{
    node_graph_to_rules, rules_to_node_graph, GraphEdge, NodePayload, RuleGraph, GLOBAL_SCOPE_ID,
};
use panelguard::model::{
    ConditionOperator, ConditionValue, Constraint, ConstraintKind, Panel, Rule, RuleCondition,
    RuleScope,
};

fn make_panel(id: &str, name: &str) -> Panel {
    Panel {
        id: id.to_string(),
        name: name.to_string(),
        width: 600.0,
        height: 800.0,
        depth: None,
        panel_type: None,
        category: None,
        model_2d: None,
        model_3d: None,
    }
}

fn make_rule(id: &str, name: &str, scope: RuleScope, constraints: Vec<Constraint>) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        scope,
        conditions: Vec::new(),
        constraints,
        dependencies: Vec::new(),
        enabled: true,
    }
}

fn bounds() -> Constraint {
    Constraint::from(ConstraintKind::Bounds)
}

fn overlap() -> Constraint {
    Constraint::from(ConstraintKind::Overlap)
}

fn type_condition(value: &str) -> RuleCondition {
    RuleCondition {
        field: "type".to_string(),
        operator: ConditionOperator::Equals,
        value: ConditionValue::Text(value.to_string()),
    }
}

#[test]
fn test_forward_id_scheme() {
    let panels = vec![make_panel("p1", "Main")];
    let mut rule = make_rule(
        "r1",
        "Bounds",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds()],
    );
    rule.conditions = vec![type_condition("switch")];

    let graph = rules_to_node_graph(&[rule], &panels);

    assert!(graph.node("panel-p1").is_some());
    assert!(graph.node("constraint-r1-0").is_some());
    assert!(graph.node("condition-r1-0-0").is_some());
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph
        .edges
        .iter()
        .any(|e| e.source == "panel-p1" && e.target == "constraint-r1-0"));
    assert!(graph
        .edges
        .iter()
        .any(|e| e.source == "constraint-r1-0" && e.target == "condition-r1-0-0"));
}

#[test]
fn test_global_rules_share_the_sentinel_lane() {
    let rules = vec![
        make_rule("r1", "Bounds", RuleScope::Global, vec![bounds()]),
        make_rule("r2", "Overlap", RuleScope::Global, vec![overlap()]),
    ];

    let graph = rules_to_node_graph(&rules, &[]);

    let scope_nodes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.payload, NodePayload::Scope { .. }))
        .collect();
    assert_eq!(scope_nodes.len(), 1);
    assert_eq!(scope_nodes[0].id, format!("panel-{}", GLOBAL_SCOPE_ID));
    match &scope_nodes[0].payload {
        NodePayload::Scope { panel_id, .. } => assert_eq!(panel_id, GLOBAL_SCOPE_ID),
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_conditions_fan_out_to_every_constraint_node() {
    let panels = vec![make_panel("p1", "Main")];
    let mut rule = make_rule(
        "r1",
        "Two checks",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds(), overlap()],
    );
    rule.conditions = vec![type_condition("switch"), type_condition("breaker")];

    let graph = rules_to_node_graph(&[rule], &panels);

    // Rule-level conditions are replicated per constraint node, not shared.
    let condition_nodes: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.payload, NodePayload::Condition { .. }))
        .collect();
    assert_eq!(condition_nodes.len(), 4);
    assert!(graph.node("condition-r1-0-0").is_some());
    assert!(graph.node("condition-r1-0-1").is_some());
    assert!(graph.node("condition-r1-1-0").is_some());
    assert!(graph.node("condition-r1-1-1").is_some());
}

#[test]
fn test_component_scoped_rules_have_no_graph_representation() {
    let rule = make_rule(
        "r1",
        "Component rule",
        RuleScope::Component {
            component_id: "sw".to_string(),
        },
        vec![bounds()],
    );

    let graph = rules_to_node_graph(&[rule], &[]);
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn test_round_trip_single_constraint_rule_is_equivalent() {
    let panels = vec![make_panel("p1", "Main")];
    let mut original = make_rule(
        "r1",
        "Bounds",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds()],
    );
    original.conditions = vec![type_condition("switch")];

    let graph = rules_to_node_graph(std::slice::from_ref(&original), &panels);
    let restored = node_graph_to_rules(&graph, &panels);

    assert_eq!(restored.len(), 1);
    let rule = &restored[0];
    assert_eq!(rule.scope, original.scope);
    assert_eq!(rule.constraints, original.constraints);
    assert_eq!(rule.conditions, original.conditions);
    assert_eq!(rule.name, original.name);
    // Ids are resynthesized from the graph.
    assert_eq!(rule.id, "rule-p1-constraint-r1-0");
}

#[test]
fn test_round_trip_splits_multi_constraint_rule() {
    let panels = vec![make_panel("p1", "Main")];
    let mut original = make_rule(
        "r1",
        "Two checks",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds(), overlap()],
    );
    original.conditions = vec![type_condition("switch")];

    let graph = rules_to_node_graph(std::slice::from_ref(&original), &panels);
    let restored = node_graph_to_rules(&graph, &panels);

    // The round trip splits a two-constraint rule into two single-constraint
    // rules; this exact shape is load-bearing for the authoring UI.
    assert_eq!(restored.len(), 2);
    assert_eq!(restored[0].constraints, vec![bounds()]);
    assert_eq!(restored[1].constraints, vec![overlap()]);
    for rule in &restored {
        assert_eq!(rule.scope, original.scope);
        assert_eq!(rule.conditions, original.conditions);
        assert_eq!(rule.constraints.len(), 1);
    }
}

#[test]
fn test_global_round_trip_dispatches_on_sentinel() {
    let original = make_rule("r1", "Bounds", RuleScope::Global, vec![bounds()]);

    let graph = rules_to_node_graph(std::slice::from_ref(&original), &[]);
    let restored = node_graph_to_rules(&graph, &[]);

    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].scope, RuleScope::Global);
    assert_eq!(restored[0].id, "rule-global-constraint-r1-0");
}

#[test]
fn test_orphan_constraint_node_is_ignored() {
    let panels = vec![make_panel("p1", "Main")];
    let rule = make_rule(
        "r1",
        "Bounds",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds()],
    );
    let mut graph = rules_to_node_graph(&[rule], &panels);

    // Detach the constraint from its scope: the node stays, the rule goes.
    graph.edges.retain(|e| e.source != "panel-p1");
    let restored = node_graph_to_rules(&graph, &panels);
    assert!(restored.is_empty());
}

#[test]
fn test_scope_without_children_produces_no_rules() {
    let panels = vec![make_panel("p1", "Main")];
    let rule = make_rule(
        "r1",
        "No constraints yet",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        Vec::new(),
    );

    let graph = rules_to_node_graph(&[rule], &panels);
    assert_eq!(graph.nodes.len(), 1, "the scope lane alone");

    let restored = node_graph_to_rules(&graph, &panels);
    assert!(restored.is_empty());
}

#[test]
fn test_dangling_edge_target_is_ignored() {
    let panels = vec![make_panel("p1", "Main")];
    let rule = make_rule(
        "r1",
        "Bounds",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds()],
    );
    let mut graph = rules_to_node_graph(&[rule], &panels);
    graph.edges.push(GraphEdge {
        id: "edge-panel-p1-nowhere".to_string(),
        source: "panel-p1".to_string(),
        target: "constraint-missing-0".to_string(),
    });

    let restored = node_graph_to_rules(&graph, &panels);
    assert_eq!(restored.len(), 1, "the dangling edge contributes nothing");
}

#[test]
fn test_graph_serializes_with_stable_tags() {
    let panels = vec![make_panel("p1", "Main")];
    let rule = make_rule(
        "r1",
        "Bounds",
        RuleScope::Panel {
            panel_id: "p1".to_string(),
        },
        vec![bounds()],
    );
    let graph = rules_to_node_graph(&[rule], &panels);

    let json = serde_json::to_string(&graph).unwrap();
    assert!(json.contains("\"kind\":\"scope\""));
    assert!(json.contains("\"kind\":\"constraint\""));
    assert!(json.contains("\"type\":\"bounds\""));

    let parsed: RuleGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.nodes.len(), graph.nodes.len());
    assert_eq!(parsed.edges.len(), graph.edges.len());
}
