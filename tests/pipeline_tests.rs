//! End-to-end pipeline tests: a realistic recipe definition carried through
//! signature analysis, rewriting, assembly, dispatch, and invocation, plus
//! the serialization contract consumers rely on.

use seriate::ast::builder as b;
use seriate::ast::types::TypeExpr;
use seriate::ast::value::{CustomValue, Value};
use seriate::recipe::Recipe;
use seriate::runtime::{AttrMap, PermissiveBackend, RecipeRegistry, SeriesRecord};

fn sym(s: &str) -> Value {
    Value::Sym(s.to_string())
}

fn a_wave() -> Value {
    Value::Custom(CustomValue::new(TypeExpr::new("Wave")))
}

/// The canonical two-series recipe: a defaulted top-level attribute, one
/// series block that forces its own style, and a main-body data expression.
fn wave_recipe() -> Recipe {
    let signature = b::signature("wave", vec![b::typed_param("w", TypeExpr::new("Wave"))]);
    let body = b::block(vec![
        b::attr_default(b::ident("color"), b::sym("blue")),
        b::series(b::block(vec![
            b::attr_force(b::ident("fillcolor"), b::sym("green")),
            b::call("rand", vec![b::num(10.0)]),
        ])),
        b::call("rand", vec![b::num(100.0)]),
    ]);
    Recipe::define(&signature, &body).unwrap()
}

#[test]
fn full_pipeline_produces_ordered_isolated_records() {
    let recipe = wave_recipe();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();

    assert_eq!(records.len(), 2, "one series block plus the main body");

    // The series record carries the fork: defaulted color plus its own fill.
    let series = &records[0];
    assert_eq!(series.attrs().get("color"), Some(&sym("blue")));
    assert_eq!(series.attrs().get("fillcolor"), Some(&sym("green")));
    assert_eq!(series.args()[0].as_list().unwrap().len(), 10);

    // The main-body record never sees the fork's write.
    let main = &records[1];
    assert_eq!(main.attrs().get("color"), Some(&sym("blue")));
    assert!(!main.attrs().contains("fillcolor"));
    assert_eq!(main.args()[0].as_list().unwrap().len(), 100);

    // The caller's map matches the main body, not the fork.
    assert_eq!(attrs.get("color"), Some(&sym("blue")));
    assert!(!attrs.contains("fillcolor"));
}

#[test]
fn random_samples_stay_in_the_unit_interval() {
    let recipe = wave_recipe();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();
    for record in &records {
        for sample in record.args()[0].as_list().unwrap() {
            let n = sample.as_number().unwrap();
            assert!((0.0..1.0).contains(&n), "sample {n} outside [0, 1)");
        }
    }
}

#[test]
fn caller_attributes_thread_through_the_whole_pipeline() {
    let recipe = wave_recipe();
    let mut attrs = AttrMap::new();
    attrs.set("color", sym("red"));
    let records = recipe
        .invoke(&mut attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();

    // `-->` defers to the caller everywhere, fork included.
    assert_eq!(attrs.get("color"), Some(&sym("red")));
    for record in &records {
        assert_eq!(record.attrs().get("color"), Some(&sym("red")));
    }
}

#[test]
fn dispatch_routes_a_wave_to_the_wave_recipe() {
    let mut registry = RecipeRegistry::new();
    registry.register(wave_recipe());

    let mut attrs = AttrMap::new();
    let records = registry
        .apply(&mut attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn invocations_are_independent() {
    let recipe = wave_recipe();

    let mut first_attrs = AttrMap::new();
    let first = recipe
        .invoke(&mut first_attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();

    let mut second_attrs = AttrMap::new();
    second_attrs.set("color", sym("red"));
    let second = recipe
        .invoke(&mut second_attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();

    assert_eq!(first[0].attrs().get("color"), Some(&sym("blue")));
    assert_eq!(second[0].attrs().get("color"), Some(&sym("red")));
}

#[test]
fn record_lists_round_trip_through_serde() {
    let recipe = wave_recipe();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[a_wave()], &PermissiveBackend)
        .unwrap();

    let encoded = serde_json::to_string(&records).unwrap();
    let decoded: Vec<SeriesRecord> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, records);
}
