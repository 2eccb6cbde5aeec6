//! PanelGuard - design rule checking for electrical panel layouts
//!
//! This library is the validation core of a panel design tool: it checks a
//! multi-panel design (placed components and combinators) against a
//! configurable rule book and reports violations with enough context to
//! locate and fix the offending entity.
//!
//! # Quick Start
//!
//! ```
//! use panelguard::{load_component_library_str, load_design_str, load_rules_str, run_drc};
//!
//! let design = load_design_str(r#"{
//!   "panels": [{"id": "p1", "name": "Main", "width": 600.0, "height": 800.0}],
//!   "components": [{"id": "pl1", "componentId": "sw", "panelId": "p1", "x": -5.0, "y": 10.0}]
//! }"#).unwrap();
//! let book = load_rules_str(r#"[
//!   {"id": "r1", "name": "Keep parts on the panel", "type": "global",
//!    "constraints": [{"type": "bounds"}]}
//! ]"#).unwrap();
//! let library = load_component_library_str(r#"[
//!   {"id": "sw", "name": "Switch", "type": "switch", "width": 40.0, "height": 60.0}
//! ]"#).unwrap();
//!
//! let report = run_drc(&book.rules, &design, &library, &[]);
//! assert!(report.has_errors());
//! ```
//!
//! # Features
//!
//! - **Rule evaluation**: dimensional, counting, spatial and co-usage
//!   constraints across global, per-panel and per-component scopes
//! - **Rule graph**: lossless-forward conversion between the flat rule list
//!   and the authoring surface's node graph
//! - **Catalog helpers**: combinator stack geometry, panel size classes,
//!   spec-bag extraction for editor dropdowns

pub mod catalog;
pub mod core;
pub mod evaluator;
pub mod graph;
pub mod model;

// Re-export main types
pub use core::{
    load_combinator_library_str, load_component_library_str, load_design_str, load_rules_str,
    rejected_rule_violations, run_drc, DrcReport, DrcStats, PanelGuardError, RejectedRule,
    RuleBook,
};
pub use catalog::{
    calculate_combinator_dimensions, combinator_stack_dimensions, filter_by_size_and_type,
    panel_size_from_width, Dimensions,
};
pub use evaluator::{evaluate_rules, evaluate_rules_with_spacing, DEFAULT_PANEL_SPACING};
pub use graph::{node_graph_to_rules, rules_to_node_graph, RuleGraph};
pub use model::{
    CanvasComponent, Combinator, Component, Constraint, ConstraintKind, Design, Panel, Rule,
    RuleCondition, RuleScope, RuleViolation, Severity, SpecValue,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        evaluate_rules, run_drc, DrcReport, DrcStats, PanelGuardError, Rule, RuleViolation,
        Severity,
    };
}
