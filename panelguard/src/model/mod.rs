//! Plain-data schema shared by the evaluator, the graph converter and the
//! host UIs. Everything here is caller-owned snapshot data with no behavior
//! beyond fallible typed accessors.

pub mod catalog;
pub mod design;
pub mod rules;

pub use catalog::{Combinator, Component, SpecValue};
pub use design::{CanvasComponent, Design, Panel};
pub use rules::{
    ConditionOperator, ConditionValue, Constraint, ConstraintKind, Rule, RuleCondition,
    RuleScope, RuleViolation, Severity,
};
