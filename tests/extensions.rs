//! Extension mounting and listener pipeline behavior across a full compile.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use graphforge::{
    CapabilitySet, Extension, FieldDefinition, FieldPatch, Registry, SchemaError, TypeDefinition,
    TypePatch,
};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_on_init_runs_exactly_once_and_is_discarded() {
    init_logging();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);

    let mut registry = Registry::new();
    registry
        .mount(move |_| {
            Extension::new().on_init(move |registry| {
                counted.fetch_add(1, Ordering::SeqCst);
                registry.register_type(
                    TypeDefinition::new("Seeded").field("id", FieldDefinition::new("Int")),
                    false,
                )
            })
        })
        .unwrap();

    registry.compile().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.get_type("Seeded").is_some());
}

#[test]
fn test_extension_listeners_rewrite_definitions() {
    init_logging();
    let mut registry = Registry::new();
    registry
        .mount(|_| {
            Extension::new()
                .on_type(|_, _| {
                    let mut patch = TypePatch::default();
                    patch.metadata.insert("audited".to_string(), json!(true));
                    patch
                })
                .on_field(|_, _| {
                    let mut patch = FieldPatch::default();
                    patch.metadata.insert("traced".to_string(), json!(true));
                    patch
                })
        })
        .unwrap();

    registry
        .register_type(
            TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();
    registry.compile().unwrap();

    let simple = registry.get_type("Simple").unwrap();
    let object = simple.as_object().unwrap();
    assert_eq!(object.metadata().get("audited"), Some(&json!(true)));

    let fields = object.fields().unwrap();
    assert_eq!(fields["id"].metadata.get("traced"), Some(&json!(true)));
}

#[test]
fn test_listener_order_is_mount_order_across_extensions() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .mount(|_| {
            Extension::new().on_field(|_, _| {
                let mut patch = FieldPatch::default();
                patch.metadata.insert("stage".to_string(), json!("first"));
                patch
            })
        })
        .unwrap();
    registry
        .mount(|_| {
            Extension::new().on_field(|field, _| {
                // The second extension observes the first one's output.
                assert_eq!(field.metadata.get("stage"), Some(&json!("first")));
                let mut patch = FieldPatch::default();
                patch.metadata.insert("stage".to_string(), json!("second"));
                patch
            })
        })
        .unwrap();

    registry
        .register_type(
            TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();
    registry.compile().unwrap();

    let simple = registry.get_type("Simple").unwrap();
    let fields = simple.as_object().unwrap().fields().unwrap();
    assert_eq!(fields["id"].metadata.get("stage"), Some(&json!("second")));
}

#[test]
fn test_no_op_listeners_compile_identically_to_no_listeners() {
    init_logging();

    let compile_simple = |with_listeners: bool| {
        let mut registry = Registry::new();
        if with_listeners {
            registry
                .mount(|_| {
                    Extension::new()
                        .on_type(|_, _| TypePatch::default())
                        .on_field(|_, _| FieldPatch::default())
                })
                .unwrap();
        }
        registry
            .register_type(
                TypeDefinition::new("Simple")
                    .field("id", FieldDefinition::new("Int!"))
                    .field("name", FieldDefinition::new("String")),
                false,
            )
            .unwrap();
        registry.compile().unwrap();
        let simple = registry.get_type("Simple").unwrap();
        let fields = simple.as_object().unwrap().fields().unwrap();
        fields
            .iter()
            .map(|(name, field)| (name.clone(), field.ty.to_string()))
            .collect::<Vec<_>>()
    };

    assert_eq!(compile_simple(false), compile_simple(true));
}

#[test]
fn test_capabilities_mount_and_invoke() {
    init_logging();
    let mut registry = Registry::new();
    registry
        .mount(|_| {
            Extension::new()
                .capability("echo", |_, args| Ok(args))
                .capability("register_simple", |registry, _| {
                    registry.register_type(
                        TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
                        false,
                    )?;
                    Ok(json!("ok"))
                })
                .capability("_private", |_, args| Ok(args))
        })
        .unwrap();

    assert_eq!(
        registry.invoke("echo", json!({"x": 1})).unwrap(),
        json!({"x": 1})
    );

    registry.invoke("register_simple", json!(null)).unwrap();
    registry.compile().unwrap();
    assert!(registry.get_type("Simple").is_some());

    // Private-prefixed capabilities are never mounted.
    let err = registry.invoke("_private", json!(null)).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownCapability { name } if name == "_private"));
}

#[test]
fn test_capability_set_is_shared_across_registries() {
    init_logging();
    let capabilities = CapabilitySet::new();

    let mut first = Registry::with_capabilities(capabilities.clone());
    first
        .mount(|_| Extension::new().capability("shared", |_, args| Ok(args)))
        .unwrap();

    let mut second = Registry::with_capabilities(capabilities);
    assert_eq!(
        second.invoke("shared", json!("hello")).unwrap(),
        json!("hello")
    );
}

#[test]
fn test_factory_receives_registry_before_init() {
    init_logging();
    let mut registry = Registry::new();
    registry
        .register_type(
            TypeDefinition::new("Existing").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();

    registry
        .mount(|registry| {
            // Factories can inspect the registry while building the extension.
            assert!(registry.get_type("Int").is_some());
            Extension::new()
        })
        .unwrap();
}
