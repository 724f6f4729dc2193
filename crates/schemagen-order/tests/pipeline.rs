//! End-to-end tests: type model → mapping → ordering → files on disk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use schemagen_map::{AvroTypeMapper, map_model};
use schemagen_order::{
    CyclePolicy, EmitReport, JsonRenderer, PipelineConfig, generate,
};
use schemagen_schemas::{SchemaSet, TypeModel};
use tempfile::TempDir;

const MODEL: &str = r#"{
    "classes": [
        {
            "name": "Order",
            "namespace": "com.acme.sales",
            "fields": [
                { "name": "id", "type": "string" },
                { "name": "placed", "type": "date" },
                { "name": "customer", "type": { "named": "com.acme.crm.Customer" } },
                { "name": "status", "type": { "named": "com.acme.sales.Status" } },
                { "name": "lines", "type": { "named": "com.acme.sales.Line" }, "repeated": true },
                { "name": "note", "type": "string", "optional": true }
            ]
        },
        {
            "name": "Line",
            "namespace": "com.acme.sales",
            "fields": [
                { "name": "sku", "type": "string" },
                { "name": "product", "type": "reference" },
                { "name": "quantity", "type": "int" }
            ]
        },
        {
            "name": "Customer",
            "namespace": "com.acme.crm",
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "since", "type": "date" },
                { "name": "account", "type": { "named": "com.acme.billing.Account" } }
            ]
        }
    ],
    "enums": [
        { "name": "Status", "namespace": "com.acme.sales", "symbols": ["OPEN", "SHIPPED"] }
    ]
}"#;

fn mapped() -> SchemaSet {
    let model: TypeModel = serde_json::from_str(MODEL).unwrap();
    map_model(&model, &AvroTypeMapper)
}

fn run(set: SchemaSet, dir: &Path) -> EmitReport {
    generate(set, &JsonRenderer, dir, &PipelineConfig::default()).unwrap()
}

fn names(report: &EmitReport) -> Vec<String> {
    report
        .entries
        .iter()
        .map(|e| format!("{}.{}", e.namespace, e.name))
        .collect()
}

#[test]
fn test_full_pipeline_order() {
    let dir = TempDir::new().unwrap();
    let set = mapped();
    let dependencies: HashMap<String, Vec<String>> = set
        .schemas
        .iter()
        .map(|s| (s.full_name(), s.dependencies.clone()))
        .collect();

    let report = run(set, dir.path());
    let order = names(&report);

    // Dates for both namespaces, then the one reference, then the model.
    assert_eq!(
        &order[..3],
        [
            "com.acme.crm.Date",
            "com.acme.sales.Date",
            "com.acme.sales.Reference",
        ]
    );
    assert_eq!(order.len(), 7);

    // The billing account is never defined and is never emitted.
    assert!(!order.iter().any(|n| n.contains("Account")));

    let position =
        |name: &str| order.iter().position(|n| n == name).unwrap();
    for (name, deps) in &dependencies {
        for dep in deps {
            if order.contains(dep) {
                assert!(
                    position(dep.as_str()) < position(name.as_str()),
                    "{dep} must precede {name}"
                );
            }
        }
    }
}

#[test]
fn test_full_pipeline_files() {
    let dir = TempDir::new().unwrap();
    let report = run(mapped(), dir.path());

    let mut ordered: Vec<String> =
        fs::read_dir(dir.path().join("avro-schemas-ordered"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
    ordered.sort();
    assert_eq!(ordered.len(), 7);
    assert_eq!(ordered[0], "1_Date.avsc");
    assert!(ordered.iter().all(|f| f.as_bytes()[1] == b'_'));

    // Filename order is emission order.
    let labels: Vec<String> = report
        .entries
        .iter()
        .map(|e| format!("{}_{}.avsc", e.label, e.name))
        .collect();
    assert_eq!(ordered, labels);

    let order_file = dir.path().join("avro-schemas/com/acme/sales/Order.avsc");
    let order: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(order_file).unwrap()).unwrap();
    assert_eq!(order["type"], "record");
    assert_eq!(order["fields"][4]["default"], serde_json::json!([]));
    assert_eq!(order["fields"][5]["default"], serde_json::Value::Null);

    // Manifest is every file's content, in order, with nothing between.
    let expected: String = report
        .entries
        .iter()
        .map(|e| fs::read_to_string(&e.ordered_path).unwrap())
        .collect();
    assert_eq!(fs::read_to_string(&report.manifest_path).unwrap(), expected);
}

#[test]
fn test_cycle_policy_from_config() {
    let json = r#"{
        "schemas": [
            { "dependencies": ["x.B"],
              "schema": { "type": "enum", "name": "A", "namespace": "x", "symbols": ["V"] } },
            { "dependencies": ["x.A"],
              "schema": { "type": "enum", "name": "B", "namespace": "x", "symbols": ["V"] } },
            { "schema": { "type": "enum", "name": "C", "namespace": "x", "symbols": ["V"] } }
        ]
    }"#;
    let set: SchemaSet = serde_json::from_str(json).unwrap();

    let dir = TempDir::new().unwrap();
    let report = run(set.clone(), dir.path());
    assert_eq!(names(&report), ["x.C"]);

    let strict = PipelineConfig {
        cycle_policy: CyclePolicy::FailFast,
        ..PipelineConfig::default()
    };
    let dir = TempDir::new().unwrap();
    let err = generate(set, &JsonRenderer, dir.path(), &strict).unwrap_err();
    assert!(err.is_cycle());
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

/// A model class named like a wrapper is written once, as the wrapper.
#[test]
fn test_class_named_like_wrapper_is_emitted_once() {
    let model: TypeModel = serde_json::from_str(
        r#"{
            "classes": [
                { "name": "Date", "namespace": "com.acme",
                  "fields": [{ "name": "iso", "type": "string" }] },
                { "name": "Order", "namespace": "com.acme",
                  "fields": [{ "name": "at", "type": "date" }] }
            ]
        }"#,
    )
    .unwrap();
    let dir = TempDir::new().unwrap();

    let report = run(map_model(&model, &AvroTypeMapper), dir.path());

    assert_eq!(names(&report), ["com.acme.Date", "com.acme.Order"]);
    let paths: HashSet<_> =
        report.entries.iter().map(|e| &e.namespace_path).collect();
    assert_eq!(paths.len(), report.entries.len());

    let date: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("avro-schemas/com/acme/Date.avsc"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(date["fields"][0]["name"], "time");
}
