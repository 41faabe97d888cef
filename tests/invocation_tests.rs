//! Generated-function invocation tests: flag semantics at runtime, keyword
//! preamble and cleanup, series forking, record counts, and the debug
//! toggle.

use seriate::ast::builder as b;
use seriate::ast::value::Value;
use seriate::diagnostics::ErrorType;
use seriate::recipe::Recipe;
use seriate::runtime::{AttrMap, Backend, BufferTrace, PermissiveBackend};

/// Rejects a fixed set of keys; everything else is supported.
struct DenyList(&'static [&'static str]);

impl Backend for DenyList {
    fn supports(&self, key: &str) -> bool {
        !self.0.contains(&key)
    }

    fn name(&self) -> &str {
        "gdraw"
    }
}

fn sym(s: &str) -> Value {
    Value::Sym(s.to_string())
}

fn data() -> Value {
    Value::List(vec![Value::Number(1.0), Value::Number(2.0)])
}

#[test]
fn caller_values_win_without_force_and_lose_with_it() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::attr_default(b::ident("color"), b::sym("red")),
        b::attr_force(b::ident("width"), b::num(2.0)),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    attrs.set("color", sym("blue"));
    attrs.set("width", Value::Number(10.0));
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();

    assert_eq!(attrs.get("color"), Some(&sym("blue")));
    assert_eq!(attrs.get("width"), Some(&Value::Number(2.0)));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].args(), &[data()]);
}

#[test]
fn quiet_skips_unsupported_keys_silently() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::flagged(
            b::attr_default(b::ident("marker"), b::sym("circle")),
            &["quiet"],
        ),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["marker"]))
        .unwrap();
    assert!(!attrs.contains("marker"));
    assert_eq!(records.len(), 1);

    // The same recipe writes the key when the backend supports it.
    let mut attrs = AttrMap::new();
    recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(attrs.get("marker"), Some(&sym("circle")));
}

#[test]
fn require_fails_the_call_naming_key_and_backend() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::flagged(
            b::attr_default(b::ident("marker"), b::sym("circle")),
            &["require"],
        ),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let err = recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["marker"]))
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Unsupported);
    let rendered = err.to_string();
    assert!(rendered.contains("`marker`"));
    assert!(rendered.contains("`gdraw`"));
    assert!(!attrs.contains("marker"));
}

#[test]
fn require_failures_carry_the_statement_span() {
    use std::sync::Arc;

    use seriate::ast::{Expr, Span, Spanned};
    use seriate::diagnostics::RecipeError;

    let span = Span { start: 12, end: 18 };
    let key = Spanned::new(Arc::new(Expr::Ident("marker".to_string(), span)), span);
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::flagged(b::attr_default(key, b::sym("circle")), &["require"]),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let err = recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["marker"]))
        .unwrap_err();
    match err {
        RecipeError::Unsupported { key, backend, ctx } => {
            assert_eq!(key, "marker");
            assert_eq!(backend, "gdraw");
            assert_eq!(ctx.span, Some(span), "label must point at the key");
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
}

#[test]
fn unflagged_writes_skip_the_support_check() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::attr_default(b::ident("marker"), b::sym("circle")),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["marker"]))
        .unwrap();
    assert_eq!(attrs.get("marker"), Some(&sym("circle")));
}

#[test]
fn keyword_parameters_bind_locals_and_clean_up_unsupported_keys() {
    let signature = b::signature(
        "plot",
        vec![
            b::keywords(vec![("shape", b::sym("auto"))]),
            b::param("xs"),
        ],
    );
    // The body returns (xs, shape), so the record shows what the local held.
    let body = b::block(vec![b::tuple(vec![b::ident("xs"), b::ident("shape")])]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    // Unsupported: the local still binds, the map is scrubbed.
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["shape"]))
        .unwrap();
    assert!(!attrs.contains("shape"));
    assert!(!records[0].attrs().contains("shape"));
    assert_eq!(records[0].args(), &[data(), sym("auto")]);

    // A caller-supplied override reaches the local even when scrubbed.
    let mut attrs = AttrMap::new();
    attrs.set("shape", sym("square"));
    let records = recipe
        .invoke(&mut attrs, &[data()], &DenyList(&["shape"]))
        .unwrap();
    assert!(!attrs.contains("shape"));
    assert_eq!(records[0].args(), &[data(), sym("square")]);

    // Supported: the default lands in the map too.
    let mut attrs = AttrMap::new();
    recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(attrs.get("shape"), Some(&sym("auto")));
}

#[test]
fn record_count_follows_series_blocks_and_the_trailing_value() {
    // Trailing attribute write evaluates to nil: no main-body record.
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![b::attr_default(b::ident("color"), b::sym("red"))]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert!(records.is_empty());

    // One series block and a trailing value: two records, main body last.
    let body = b::block(vec![
        b::series(b::block(vec![b::num(7.0)])),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].args(), &[Value::Number(7.0)]);
    assert_eq!(records[1].args(), &[data()]);

    // A series block with a nil trailing value still yields one record,
    // with the one-element nil pack.
    let body = b::block(vec![b::series(b::block(vec![b::attr_default(
        b::ident("color"),
        b::sym("red"),
    )]))]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].args(), &[Value::Nil]);
}

#[test]
fn series_blocks_fork_independent_maps() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::attr_default(b::ident("color"), b::sym("red")),
        b::series(b::block(vec![
            b::attr_force(b::ident("color"), b::sym("green")),
            b::attr_default(b::ident("fill"), b::sym("green")),
            b::num(1.0),
        ])),
        // Runs after the fork; must not appear in the series record.
        b::attr_force(b::ident("width"), b::num(3.0)),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(records.len(), 2);

    let forked = records[0].attrs();
    assert_eq!(forked.get("color"), Some(&sym("green")));
    assert_eq!(forked.get("fill"), Some(&sym("green")));
    assert!(!forked.contains("width"));

    let main = records[1].attrs();
    assert_eq!(main.get("color"), Some(&sym("red")));
    assert!(!main.contains("fill"));
    assert_eq!(main.get("width"), Some(&Value::Number(3.0)));
}

#[test]
fn attribute_writes_inside_series_sub_blocks_land_on_the_fork() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::series(b::block(vec![
            b::if_then(
                b::boolean(true),
                b::block(vec![b::attr_force(b::ident("fillcolor"), b::sym("green"))]),
            ),
            b::num(1.0),
        ])),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(
        records[0].attrs().get("fillcolor"),
        Some(&sym("green"))
    );
    assert!(!attrs.contains("fillcolor"));
    assert!(!records[1].attrs().contains("fillcolor"));
}

#[test]
fn series_bodies_read_enclosing_locals_without_leaking_their_own() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![
        b::assign("scale", b::num(2.0)),
        b::series(b::block(vec![
            b::assign("inner", b::num(9.0)),
            b::call("*", vec![b::ident("scale"), b::num(3.0)]),
        ])),
        b::ident("xs"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap();
    assert_eq!(records[0].args(), &[Value::Number(6.0)]);

    // `inner` must not be visible after the series block.
    let body = b::block(vec![
        b::series(b::block(vec![b::assign("inner", b::num(9.0))])),
        b::ident("inner"),
    ]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let err = recipe
        .invoke(&mut attrs, &[data()], &PermissiveBackend)
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Eval);
}

#[test]
fn omitted_trailing_arguments_take_their_defaults() {
    let signature = b::signature(
        "line",
        vec![
            b::param("x"),
            b::defaulted_param("n", None, b::num(4.0)),
        ],
    );
    let body = b::block(vec![b::call("range", vec![b::ident("n")])]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(&mut attrs, &[Value::Number(1.0)], &PermissiveBackend)
        .unwrap();
    let items = records[0].args()[0].as_list().unwrap();
    assert_eq!(items.len(), 4);

    // An explicit argument overrides the default.
    let mut attrs = AttrMap::new();
    let records = recipe
        .invoke(
            &mut attrs,
            &[Value::Number(1.0), Value::Number(2.0)],
            &PermissiveBackend,
        )
        .unwrap();
    assert_eq!(records[0].args()[0].as_list().unwrap().len(), 2);

    // A missing argument with no default is an error.
    let mut attrs = AttrMap::new();
    let err = recipe
        .invoke(&mut attrs, &[], &PermissiveBackend)
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Eval);
    assert!(err.to_string().contains("`x`"));
}

#[test]
fn too_many_arguments_are_rejected() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let body = b::block(vec![b::ident("xs")]);
    let recipe = Recipe::define(&signature, &body).unwrap();
    let mut attrs = AttrMap::new();
    let err = recipe
        .invoke(
            &mut attrs,
            &[data(), Value::Number(1.0)],
            &PermissiveBackend,
        )
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Eval);
}

#[test]
fn non_block_bodies_are_rejected_at_definition_time() {
    let signature = b::signature("plot", vec![b::param("xs")]);
    let err = Recipe::define(&signature, &b::num(1.0)).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Malformed);
}

#[test]
fn debug_toggle_traces_invocations_without_affecting_records() {
    let signature = b::signature("traced", vec![b::param("xs")]);
    let body = b::block(vec![b::ident("xs")]);
    let recipe = Recipe::define(&signature, &body).unwrap();

    let mut trace = BufferTrace::default();

    seriate::set_debug(true);
    let mut attrs = AttrMap::new();
    let traced = recipe
        .invoke_traced(&mut attrs, &[data()], &PermissiveBackend, &mut trace)
        .unwrap();
    seriate::set_debug(false);

    assert_eq!(trace.lines.len(), 1);
    assert!(trace.lines[0].starts_with("traced("));

    let mut attrs = AttrMap::new();
    let silent = recipe
        .invoke_traced(&mut attrs, &[data()], &PermissiveBackend, &mut trace)
        .unwrap();
    assert_eq!(trace.lines.len(), 1, "disabled toggle must stop tracing");
    assert_eq!(traced, silent);
}
