use criterion::{black_box, criterion_group, criterion_main, Criterion};
use panelguard::evaluator::evaluate_rules;
use panelguard::model::{
    CanvasComponent, Component, Constraint, ConstraintKind, Panel, Rule, RuleScope,
};
use std::collections::HashMap;

fn synthetic_design(
    placements_per_panel: usize,
) -> (Vec<Panel>, Vec<Component>, Vec<CanvasComponent>) {
    let panels: Vec<Panel> = (0..4)
        .map(|i| Panel {
            id: format!("p{}", i),
            name: format!("Panel {}", i),
            width: 600.0,
            height: 800.0,
            depth: None,
            panel_type: None,
            category: None,
            model_2d: None,
            model_3d: None,
        })
        .collect();

    let library = vec![Component {
        id: "sw".to_string(),
        name: "Switch".to_string(),
        component_type: "switch".to_string(),
        category: None,
        width: 40.0,
        height: 60.0,
        depth: None,
        color: None,
        specs: HashMap::new(),
        tags: Vec::new(),
        required_components: Vec::new(),
    }];

    let mut placements = Vec::new();
    for panel in &panels {
        for i in 0..placements_per_panel {
            placements.push(CanvasComponent {
                id: format!("{}-pl-{}", panel.id, i),
                component_id: "sw".to_string(),
                panel_id: panel.id.clone(),
                x: (i % 10) as f64 * 55.0,
                y: (i / 10) as f64 * 70.0,
                rotation: None,
                scale: None,
                properties: HashMap::new(),
            });
        }
    }

    (panels, library, placements)
}

fn bench_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "bounds".to_string(),
            name: "Bounds".to_string(),
            scope: RuleScope::Global,
            conditions: Vec::new(),
            constraints: vec![Constraint::from(ConstraintKind::Bounds)],
            dependencies: Vec::new(),
            enabled: true,
        },
        Rule {
            id: "overlap".to_string(),
            name: "Overlap".to_string(),
            scope: RuleScope::Global,
            conditions: Vec::new(),
            constraints: vec![Constraint::from(ConstraintKind::Overlap)],
            dependencies: Vec::new(),
            enabled: true,
        },
        Rule {
            id: "spacing".to_string(),
            name: "Spacing".to_string(),
            scope: RuleScope::Global,
            conditions: Vec::new(),
            constraints: vec![Constraint::from(ConstraintKind::Spacing { spacing: 5.0 })],
            dependencies: Vec::new(),
            enabled: true,
        },
    ]
}

fn bench_evaluate_small(c: &mut Criterion) {
    let (panels, library, placements) = synthetic_design(20);
    let rules = bench_rules();

    c.bench_function("evaluate_80_placements", |b| {
        b.iter(|| {
            evaluate_rules(
                black_box(&rules),
                black_box(&panels),
                black_box(&placements),
                black_box(&library),
                black_box(&[]),
            )
        });
    });
}

fn bench_evaluate_large(c: &mut Criterion) {
    let (panels, library, placements) = synthetic_design(100);
    let rules = bench_rules();

    c.bench_function("evaluate_400_placements", |b| {
        b.iter(|| {
            evaluate_rules(
                black_box(&rules),
                black_box(&panels),
                black_box(&placements),
                black_box(&library),
                black_box(&[]),
            )
        });
    });
}

criterion_group!(benches, bench_evaluate_small, bench_evaluate_large);
criterion_main!(benches);
