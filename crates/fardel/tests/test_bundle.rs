use std::fs;
use std::future::{self, Future};

use fardel::ast::{Expr, LitValue, Stmt};
use fardel::ast_builder as builder;
use fardel::ast_indexer::{MODULE_INDEX_RANGE, NodeIndexer};
use fardel::visitors::RequireCollector;
use fardel::{
    AssembleError, BuiltinTemplates, Emit, ExportTable, Generator, Module, ModuleRegistry,
    Options, Program, SingleFileEmitter, TemplateKind, TemplateProvider, Uid,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn init_logs() {
    // RUST_LOG=fardel=debug surfaces the assembly trace when a test fails
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Index `body` into its own id range, discover its require sites, and
/// resolve each one through `resolve`, the same steps an upstream
/// resolution stage performs before handing modules over.
fn resolved_module(
    uid: impl Into<Uid>,
    ordinal: u32,
    mut body: Program,
    resolve: impl Fn(&str) -> Option<Uid>,
) -> Module {
    NodeIndexer::with_base(ordinal * MODULE_INDEX_RANGE).index_program(&mut body);
    let sites = RequireCollector::collect(&body);
    let call_sites: Vec<_> = sites.iter().map(|site| site.call_site).collect();
    let targets: Vec<_> = sites.iter().map(|site| resolve(&site.name)).collect();
    Module::with_parallel_deps(uid, body, call_sites, targets).unwrap()
}

/// `var dom = require("./dom"); exports.render = dom.render;`
fn app_body() -> Program {
    builder::program(vec![
        builder::var_decl(vec![builder::declarator(
            "dom",
            Some(builder::require_call("./dom")),
        )]),
        builder::expr_stmt(builder::assign(
            builder::member(builder::name("exports"), "render"),
            builder::member(builder::name("dom"), "render"),
        )),
    ])
}

/// `exports.render = function (el) { return el; };`
fn dom_body() -> Program {
    builder::program(vec![builder::expr_stmt(builder::assign(
        builder::member(builder::name("exports"), "render"),
        builder::function_expr(
            &["el"],
            vec![builder::return_stmt(Some(builder::name("el")))],
        ),
    ))])
}

/// Two-module fixture: module 0 requires module 1, and `App` names module 0.
fn two_module_registry() -> (ModuleRegistry, ExportTable) {
    let mut modules = ModuleRegistry::new();
    modules
        .insert(resolved_module(0u64, 0, app_body(), |name| match name {
            "./dom" => Some(Uid::Int(1)),
            _ => None,
        }))
        .unwrap();
    modules
        .insert(resolved_module(1u64, 1, dom_body(), |_| None))
        .unwrap();

    let mut exports = ExportTable::new();
    exports.insert_named("App", 0u64).unwrap();
    (modules, exports)
}

#[tokio::test]
async fn test_var_export_bundle_matches_snapshot() {
    init_logs();
    let (modules, exports) = two_module_registry();
    let options = Options::new();

    let program = fardel::bundle(&BuiltinTemplates, &modules, &exports, &options)
        .await
        .unwrap();
    let output = Generator::new().generate(&program);

    assert!(
        output.starts_with("var App;\n"),
        "var-style exports must hoist their declaration above the closure"
    );
    insta::assert_snapshot!("var_export_bundle", output);
}

#[tokio::test]
async fn test_globalized_bundle_matches_snapshot() {
    init_logs();
    let resolve = |name: &str| match name {
        "./dom" => Some(Uid::from("dom")),
        _ => None,
    };

    // module "app" carries one resolvable and one unresolvable require
    let boot = builder::program(vec![
        builder::var_decl(vec![builder::declarator(
            "dom",
            Some(builder::require_call("./dom")),
        )]),
        builder::var_decl(vec![builder::declarator(
            "missing",
            Some(builder::require_call("./missing")),
        )]),
        builder::expr_stmt(builder::assign(
            builder::member(builder::name("exports"), "boot"),
            builder::function_expr(
                &[],
                vec![builder::return_stmt(Some(builder::member(
                    builder::name("dom"),
                    "render",
                )))],
            ),
        )),
    ]);
    // module "tracking" is bundled for its side effect only
    let tracking = builder::program(vec![builder::expr_stmt(builder::assign(
        builder::member(builder::name("window"), "tracked"),
        builder::literal(LitValue::Bool(true)),
    ))]);

    let mut modules = ModuleRegistry::new();
    modules
        .insert(resolved_module("app", 0, boot, resolve))
        .unwrap();
    modules
        .insert(resolved_module("dom", 1, dom_body(), resolve))
        .unwrap();
    modules
        .insert(resolved_module("tracking", 2, tracking, resolve))
        .unwrap();

    let mut exports = ExportTable::new();
    exports.insert_named("App", "app").unwrap();
    exports.push_nameless("tracking");

    let options = Options::new().globalize("window");
    let program = fardel::bundle(&BuiltinTemplates, &modules, &exports, &options)
        .await
        .unwrap();
    let output = Generator::new().generate(&program);

    assert!(
        output.contains("var missing = null;"),
        "unresolved requires must be nulled out in place"
    );
    insta::assert_snapshot!("globalized_bundle", output);
}

#[test]
fn test_registration_follows_insertion_order() {
    let mut modules = ModuleRegistry::new();
    modules.insert(Module::new(5u64, dom_body())).unwrap();
    modules.insert(Module::new(2u64, dom_body())).unwrap();

    let program = futures::executor::block_on(fardel::bundle(
        &BuiltinTemplates,
        &modules,
        &ExportTable::new(),
        &Options::new(),
    ))
    .unwrap();
    let output = Generator::new().generate(&program);

    let first = output.find("    5: function").expect("module 5 registered");
    let second = output.find("    2: function").expect("module 2 registered");
    assert!(
        first < second,
        "registration must preserve insertion order, not sort by uid"
    );
}

#[test]
fn test_failed_modules_leave_no_trace_in_the_artifact() {
    let resolve = |name: &str| match name {
        "./dom" => Some(Uid::Int(1)),
        _ => None,
    };
    let mut modules = ModuleRegistry::new();
    modules
        .insert(resolved_module(0u64, 0, app_body(), resolve))
        .unwrap();
    modules
        .insert(resolved_module(1u64, 1, dom_body(), resolve).failed())
        .unwrap();

    let program = futures::executor::block_on(fardel::bundle(
        &BuiltinTemplates,
        &modules,
        &ExportTable::new(),
        &Options::new(),
    ))
    .unwrap();
    let output = Generator::new().generate(&program);

    assert!(
        !output.contains("1: function"),
        "failed modules must not be registered"
    );
    assert!(
        output.contains("var dom = null;"),
        "requires of failed modules must be nulled like unresolved ones"
    );
}

#[tokio::test]
async fn test_bundle_rejects_exports_of_unknown_modules() {
    let mut modules = ModuleRegistry::new();
    modules.insert(Module::new(0u64, dom_body())).unwrap();

    let mut exports = ExportTable::new();
    exports.insert_named("Ghost", 7u64).unwrap();

    let err = fardel::bundle(&BuiltinTemplates, &modules, &exports, &Options::new())
        .await
        .unwrap_err();
    match err.downcast_ref::<AssembleError>() {
        Some(AssembleError::UnknownNamedExport { name, uid }) => {
            assert_eq!(name, "Ghost");
            assert_eq!(uid, &Uid::Int(7));
        }
        other => panic!("expected an unknown-export error, got {other:?}"),
    }
}

/// Provider whose wrapper fetch fails, standing in for an unreachable
/// template store.
struct OfflineWrapperStore;

impl TemplateProvider for OfflineWrapperStore {
    fn fetch(&self, kind: TemplateKind) -> impl Future<Output = anyhow::Result<Program>> + Send {
        async move {
            if kind == TemplateKind::Wrapper {
                anyhow::bail!("wrapper template store is offline");
            }
            BuiltinTemplates.fetch(kind).await
        }
    }
}

#[tokio::test]
async fn test_fetch_failures_surface_unchanged() {
    init_logs();
    let (modules, exports) = two_module_registry();

    let err = fardel::bundle(&OfflineWrapperStore, &modules, &exports, &Options::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "wrapper template store is offline");
    assert!(
        err.downcast_ref::<AssembleError>().is_none(),
        "a failed fetch must abort the load before any assembly runs"
    );
}

const WRAPPER_JSON: &str = r#"{
    "body": [{
        "type": "ExpressionStatement",
        "expression": {
            "type": "CallExpression",
            "callee": { "type": "FunctionExpression", "params": ["modules"], "body": [] },
            "arguments": [{ "type": "ObjectExpression", "properties": [] }]
        }
    }]
}"#;

const MODULE_JSON: &str = r#"{
    "body": [{
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": [{
            "name": "module",
            "init": {
                "type": "ObjectExpression",
                "properties": [{
                    "key": { "type": "Literal", "value": "id" },
                    "value": {
                        "type": "FunctionExpression",
                        "params": ["require", "module", "exports", "global"],
                        "body": []
                    }
                }]
            }
        }]
    }]
}"#;

const NAMED_JSON: &str = r#"{
    "body": [{
        "type": "ExpressionStatement",
        "expression": {
            "type": "AssignmentExpression",
            "left": {
                "type": "MemberExpression",
                "object": { "type": "Identifier", "name": "window" },
                "property": { "type": "Literal", "value": "name" },
                "computed": true
            },
            "right": {
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": "require" },
                "arguments": [{ "type": "Literal", "value": null }]
            }
        }
    }]
}"#;

const VAR_NAMED_JSON: &str = r#"{
    "body": [{
        "type": "ExpressionStatement",
        "expression": {
            "type": "AssignmentExpression",
            "left": { "type": "Identifier", "name": "name" },
            "right": {
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": "require" },
                "arguments": [{ "type": "Literal", "value": null }]
            }
        }
    }]
}"#;

const NAMELESS_JSON: &str = r#"{
    "body": [{
        "type": "ExpressionStatement",
        "expression": {
            "type": "CallExpression",
            "callee": { "type": "Identifier", "name": "require" },
            "arguments": [{ "type": "Literal", "value": null }]
        }
    }]
}"#;

/// Templates delivered as estree JSON fragments, the shape a provider that
/// reads pre-parsed template files would hand over.
struct JsonTemplates;

impl TemplateProvider for JsonTemplates {
    fn fetch(&self, kind: TemplateKind) -> impl Future<Output = anyhow::Result<Program>> + Send {
        let source = match kind {
            TemplateKind::Wrapper => WRAPPER_JSON,
            TemplateKind::Module => MODULE_JSON,
            TemplateKind::Named => NAMED_JSON,
            TemplateKind::VarNamed => VAR_NAMED_JSON,
            TemplateKind::Nameless => NAMELESS_JSON,
        };
        let parsed: anyhow::Result<Program> =
            serde_json::from_str(source).map_err(anyhow::Error::from);
        future::ready(parsed)
    }
}

#[tokio::test]
async fn test_json_template_fragments_satisfy_the_provider_contract() {
    let mut modules = ModuleRegistry::new();
    modules
        .insert(Module::new(
            0u64,
            builder::program(vec![builder::expr_stmt(builder::assign(
                builder::member(builder::name("exports"), "ok"),
                builder::literal(LitValue::Bool(true)),
            ))]),
        ))
        .unwrap();
    let mut exports = ExportTable::new();
    exports.insert_named("App", 0u64).unwrap();

    let program = fardel::bundle(&JsonTemplates, &modules, &exports, &Options::new())
        .await
        .unwrap();
    let output = Generator::new().generate(&program);

    let expected = concat!(
        "var App;\n",
        "(function (modules) {\n",
        "    App = require(0);\n",
        "})({\n",
        "    0: function (require, module, exports, global) {\n",
        "        exports.ok = true;\n",
        "    }\n",
        "});\n",
    );
    assert_eq!(output, expected);
}

#[test]
fn test_single_file_emitter_round_trips_through_disk() {
    let (modules, exports) = two_module_registry();
    let program = futures::executor::block_on(fardel::bundle(
        &BuiltinTemplates,
        &modules,
        &exports,
        &Options::new(),
    ))
    .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bundle.js");
    let mut emitter = SingleFileEmitter::new(fs::File::create(&path).unwrap());
    emitter.emit(&program).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        Generator::new().generate(&program),
        "the emitted file must carry exactly the generated source"
    );
    assert!(
        written.ends_with("});\n"),
        "artifact ends with the wrapper invocation"
    );
}

#[tokio::test]
async fn test_assembly_is_deterministic_and_leaves_inputs_untouched() {
    let (modules, exports) = two_module_registry();
    let options = Options::new();

    let first = fardel::bundle(&BuiltinTemplates, &modules, &exports, &options)
        .await
        .unwrap();
    let second = fardel::bundle(&BuiltinTemplates, &modules, &exports, &options)
        .await
        .unwrap();

    assert_eq!(first, second, "same inputs must assemble to the same tree");
    assert_eq!(
        Generator::new().generate(&first),
        Generator::new().generate(&second)
    );

    // rewriting happens on clones; the registered body still carries the
    // original by-name require
    let app = modules.get(&Uid::Int(0)).expect("module 0 still registered");
    let Stmt::VarDecl(decl) = &app.body.body[0] else {
        panic!("expected the leading declaration");
    };
    match decl.declarations[0].init.as_deref() {
        Some(Expr::Call(call)) => match call.arguments.first() {
            Some(Expr::Lit(lit)) => assert_eq!(lit.value, LitValue::Str("./dom".to_owned())),
            other => panic!("expected the original name argument, got {other:?}"),
        },
        other => panic!("expected the original require call, got {other:?}"),
    }
}
