//! End-to-end schema compilation tests: registration through `compile()` to
//! materialized field maps.

use graphforge::{
    ArgDefinition, Definition, FieldDefinition, GraphType, InterfaceDefinition, Registry,
    SchemaError, TypeDefinition, UnionDefinition,
};
use serde_json::Value;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_type_implementing_interface_compiles_with_cross_references() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_interface(
            InterfaceDefinition::new("Employee")
                .field("employee_id", FieldDefinition::new("String")),
            false,
        )
        .unwrap();
    registry
        .register_type(
            TypeDefinition::new("Person")
                .implements("Employee")
                .field("employee_id", FieldDefinition::new("String"))
                .field("name", FieldDefinition::new("String")),
            false,
        )
        .unwrap();

    let schema = registry.compile().unwrap();

    let names = schema.type_names();
    assert!(names.contains(&"Employee".to_string()));
    assert!(names.contains(&"Person".to_string()));

    let employee = registry.get_type("Employee").unwrap();
    let person = registry.get_type("Person").unwrap();
    let person_obj = person.as_object().unwrap();

    assert_eq!(person_obj.interfaces().to_vec(), vec![employee.clone()]);

    let person_fields = person_obj.fields().unwrap();
    let employee_fields = employee.as_interface().unwrap().fields().unwrap();
    for key in employee_fields.keys() {
        assert!(
            person_fields.contains_key(key),
            "Person is missing interface field {key}"
        );
    }
}

#[test]
fn test_mutation_with_non_null_arg_and_named_result() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_type(
            TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();
    registry
        .add_mutation(
            "create_simple",
            FieldDefinition::new("Simple").arg("id", ArgDefinition::new("Int!")),
            false,
        )
        .unwrap();

    let schema = registry.compile().unwrap();
    let simple = registry.get_type("Simple").unwrap();

    let mutation_fields = schema
        .mutation()
        .unwrap()
        .as_object()
        .unwrap()
        .fields()
        .unwrap();
    let create = &mutation_fields["create_simple"];

    assert_eq!(create.ty, simple);
    let id_arg = &create.args.as_ref().unwrap()["id"];
    assert!(id_arg.ty.is_non_null());
    assert_eq!(id_arg.ty.unwrapped(), &registry.get_type("Int").unwrap());
}

#[test]
fn test_mutually_recursive_types_materialize() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_type(
            TypeDefinition::new("User")
                .field("id", FieldDefinition::new("Int"))
                .field("group", FieldDefinition::new("Group")),
            false,
        )
        .unwrap();
    registry
        .register_type(
            TypeDefinition::new("Group")
                .field("id", FieldDefinition::new("Int"))
                .field("owner", FieldDefinition::new("User")),
            false,
        )
        .unwrap();

    registry.compile().unwrap();

    let user = registry.get_type("User").unwrap();
    let group = registry.get_type("Group").unwrap();

    let user_fields = user.as_object().unwrap().fields().unwrap();
    let group_fields = group.as_object().unwrap().fields().unwrap();
    assert_eq!(user_fields["group"].ty, group);
    assert_eq!(group_fields["owner"].ty, user);
}

#[test]
fn test_list_composition_by_embedding_concrete_wrapper() {
    init_logging();
    let mut registry = Registry::new();

    let int = registry.get_type("Int").unwrap();
    registry
        .register_type(
            TypeDefinition::new("Bag")
                .field("items", FieldDefinition::new(GraphType::list(int.clone()))),
            false,
        )
        .unwrap();

    registry.compile().unwrap();
    let bag = registry.get_type("Bag").unwrap();
    let fields = bag.as_object().unwrap().fields().unwrap();
    assert_eq!(fields["items"].ty, GraphType::list(int));
}

#[test]
fn test_union_end_to_end() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_type(
            TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();
    registry
        .register_union(
            UnionDefinition::new("SimpleUnion")
                .types(["Simple"])
                .resolve_type(|_, _| "Simple".to_string()),
            false,
        )
        .unwrap();

    registry.compile().unwrap();

    let simple = registry.get_type("Simple").unwrap();
    let union = registry.get_type("SimpleUnion").unwrap();
    let union = union.as_union().unwrap();

    assert_eq!(union.members().len(), 1);
    assert_eq!(union.members()[0], simple);

    let resolved = union
        .resolve_type(&Value::Null, &Value::Null)
        .expect("resolver present")
        .unwrap();
    assert_eq!(resolved, simple);
}

#[test]
fn test_union_without_types_aborts_compile() {
    init_logging();
    let mut registry = Registry::new();
    registry
        .register_union(UnionDefinition::new("Broken"), false)
        .unwrap();
    let err = registry.compile().unwrap_err();
    assert!(matches!(err, SchemaError::MalformedUnion { name, .. } if name == "Broken"));
}

#[test]
fn test_unknown_reference_surfaces_at_compile_time() {
    init_logging();
    let mut registry = Registry::new();
    registry
        .add_query("broken", FieldDefinition::new("Nope"), false)
        .unwrap();
    let err = registry.compile().unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { name } if name == "Nope"));
}

#[test]
fn test_factory_definition_can_consult_registry() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_type(
            Definition::deferred(|registry: &Registry| {
                // The factory sees the owning registry, e.g. to check what is
                // already finalized.
                let id_type = if registry.get_type("ID").is_some() {
                    "ID"
                } else {
                    "Int"
                };
                TypeDefinition::new("Account").field("id", FieldDefinition::new(id_type))
            }),
            false,
        )
        .unwrap();

    registry.compile().unwrap();
    let account = registry.get_type("Account").unwrap();
    let fields = account.as_object().unwrap().fields().unwrap();
    assert_eq!(fields["id"].ty, registry.get_type("ID").unwrap());
}

#[test]
fn test_json_definitions_compile() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_interface_str(
            r#"{ "name": "Node", "fields": { "id": { "type": "ID!" } } }"#,
            false,
        )
        .unwrap();
    registry
        .register_type_str(
            r#"{
                "name": "Simple",
                "interfaces": ["Node"],
                "fields": { "id": { "type": "ID!" } },
                "queries": {
                    "simple": {
                        "type": "Simple",
                        "args": { "id": { "type": "ID!" } }
                    }
                }
            }"#,
            false,
        )
        .unwrap();

    let schema = registry.compile().unwrap();
    let queries = schema
        .query()
        .unwrap()
        .as_object()
        .unwrap()
        .fields()
        .unwrap();
    assert_eq!(queries["simple"].ty, registry.get_type("Simple").unwrap());
}

#[test]
fn test_json_operations_register_and_compile() {
    init_logging();
    let mut registry = Registry::new();

    registry
        .register_type(
            TypeDefinition::new("Simple").field("id", FieldDefinition::new("Int")),
            false,
        )
        .unwrap();
    registry
        .add_query_str(
            "simple",
            r#"{ "type": "Simple", "args": { "id": { "type": "Int!" } } }"#,
            false,
        )
        .unwrap();
    registry
        .add_mutation_str("create_simple", r#"{ "type": "Simple" }"#, false)
        .unwrap();

    let schema = registry.compile().unwrap();
    let simple = registry.get_type("Simple").unwrap();

    let queries = schema.query().unwrap().as_object().unwrap().fields().unwrap();
    assert_eq!(queries["simple"].ty, simple);
    assert!(queries["simple"].args.as_ref().unwrap()["id"].ty.is_non_null());

    let mutations = schema
        .mutation()
        .unwrap()
        .as_object()
        .unwrap()
        .fields()
        .unwrap();
    assert_eq!(mutations["create_simple"].ty, simple);
}

#[test]
fn test_json_definition_from_file() {
    init_logging();
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "name": "FromDisk", "fields": {{ "id": {{ "type": "Int" }} }} }}"#
    )
    .unwrap();

    let mut registry = Registry::new();
    registry.register_type_file(file.path(), false).unwrap();
    registry.compile().unwrap();
    assert!(registry.get_type("FromDisk").is_some());
}
