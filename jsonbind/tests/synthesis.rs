//! End-to-end synthesis scenarios through the public facade.

use jsonbind::codegen::{AccessorKind, generate_from_str};
use jsonbind::prelude::*;
use jsonbind::schema::TypeKind;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn session_with(name: &str, text: &str) -> BuildSession {
    init_tracing();
    let mut session = BuildSession::default();
    session.add_schema(name, text).expect("Failed to parse schema");
    session.run(name).expect("Failed to run entry");
    session
}

const PERSON: &str = r#"{ "properties": {"Name": {"type":"string"}}, "required":["Name"] }"#;

#[test]
fn test_joe_namath_canonical_text() {
    let session = session_with("Person", PERSON);
    let set = session.descriptors("Person").unwrap();
    let person =
        DynamicObject::create(set, session.graph(), "Person", vec!["Joe Namath".into()]).unwrap();

    assert_eq!(person.to_canonical_text(), r#"{"Name":"Joe Namath"}"#);
    assert_eq!(
        person.bindings().to_pretty_text(),
        "{\n  \"Name\": \"Joe Namath\"\n}"
    );

    let parsed = Bindings::from_json(r#"{"Name":"Joe Namath"}"#).unwrap();
    assert_eq!(&parsed, person.bindings());
}

#[test]
fn test_union_tracks_last_alternative_set() {
    let session = session_with(
        "Holder",
        r##"{"properties": {"value": {"oneOf": [
                {"$ref": "#/definitions/A"},
                {"$ref": "#/definitions/B"}]}},
            "definitions": {
                "A": {"properties": {"a": {"type": "string"}}, "required": ["a"],
                      "additionalProperties": false},
                "B": {"properties": {"b": {"type": "integer"}}, "required": ["b"],
                      "additionalProperties": false}}}"##,
    );
    let set = session.descriptors("Holder").unwrap();
    let graph = session.graph();
    let holder = DynamicObject::new(set, graph, "Holder").unwrap();
    let a = DynamicObject::create(set, graph, "A", vec!["first".into()]).unwrap();
    let b = DynamicObject::create(set, graph, "B", vec![2i64.into()]).unwrap();

    holder.set("set_value_as_a", a.bindings().clone()).unwrap();
    assert!(holder.get("value_as_a").unwrap().is_some());
    assert!(holder.get("value_as_b").unwrap().is_none());

    holder.set("set_value_as_b", b.bindings().clone()).unwrap();
    let current = holder.get("value").unwrap().unwrap();
    assert!(current.as_bindings().unwrap().ptr_eq(b.bindings()));
    assert!(holder.get("value_as_a").unwrap().is_none());
    assert_eq!(
        holder.get("value_as_b").unwrap(),
        Some(TypedValue::Object(b.bindings().clone()))
    );
}

#[test]
fn test_overlapping_alternatives_track_last_setter() {
    let session = session_with(
        "Record",
        r##"{"properties": {
            "thing": {"oneOf": [{"$ref": "#/definitions/A"}, {"$ref": "#/definitions/B"}]},
            "when": {"oneOf": [{"type": "string"}, {"type": "string", "format": "date", "title": "Day"}]},
            "size": {"oneOf": [{"type": "integer"}, {"type": "number"}]}},
            "definitions": {
                "A": {"properties": {"a": {"type": "string"}}},
                "B": {"properties": {"b": {"type": "string"}}}}}"##,
    );
    let set = session.descriptors("Record").unwrap();
    let graph = session.graph();
    let thing = DynamicObject::new(set, graph, "Record").unwrap();

    for (setter, present, absent) in [
        ("set_thing_as_a", "thing_as_a", "thing_as_b"),
        ("set_thing_as_b", "thing_as_b", "thing_as_a"),
        ("set_thing_as_a", "thing_as_a", "thing_as_b"),
    ] {
        thing.set(setter, Bindings::new()).unwrap();
        assert!(thing.get(present).unwrap().is_some(), "{setter} then {present}");
        assert!(thing.get(absent).unwrap().is_none(), "{setter} then {absent}");
    }

    thing.set("set_when_as_string", "1999-05-22").unwrap();
    assert_eq!(thing.get("when_as_string").unwrap(), Some("1999-05-22".into()));
    assert_eq!(thing.get("when_as_day").unwrap(), None);

    thing.set("set_size_as_number", 1.0).unwrap();
    assert_eq!(thing.get("size_as_integer").unwrap(), None);
    assert_eq!(thing.get("size_as_number").unwrap(), Some(TypedValue::Number(1.0)));
    thing.set("set_size_as_integer", 1i64).unwrap();
    assert_eq!(thing.get("size_as_integer").unwrap(), Some(TypedValue::Integer(1)));
    assert_eq!(thing.get("size_as_number").unwrap(), None);

    // Text carries no tags; reloaded values are discriminated
    let reloaded = Bindings::from_json(&thing.to_canonical_text()).unwrap();
    let reloaded = DynamicObject::wrap(set, graph, "Record", reloaded).unwrap();
    assert!(reloaded.get("when_as_day").unwrap().is_some());
    assert!(reloaded.get("when_as_string").unwrap().is_none());
}

#[test]
fn test_disjoint_intersection_exposes_both_property_sets() {
    let session = session_with(
        "Both",
        r##"{"allOf": [
            {"$ref": "#/definitions/A"},
            {"properties": {"b": {"type": "integer"}}, "required": ["b"]}
        ], "definitions": {
            "A": {"properties": {"a": {"type": "string"}}}
        }}"##,
    );
    let set = session.descriptors("Both").unwrap();
    let both = set.by_name("Both").unwrap();
    for accessor in ["a", "set_a", "b", "set_b"] {
        assert!(both.accessor(accessor).is_some(), "missing {accessor}");
    }

    let value = DynamicObject::create(set, session.graph(), "Both", vec![5i64.into()]).unwrap();
    value.set("set_a", "merged").unwrap();
    assert_eq!(value.get("a").unwrap(), Some("merged".into()));
    assert_eq!(value.get("b").unwrap(), Some(TypedValue::Integer(5)));
    assert_eq!(value.to_canonical_text(), r#"{"b":5,"a":"merged"}"#);
}

#[test]
fn test_self_reference_terminates_and_shares_node() {
    let session = session_with(
        "Tree",
        r##"{"type": "object", "properties": {
            "label": {"type": "string"},
            "parent": {"$ref": "#"},
            "children": {"type": "array", "items": {"$ref": "#"}}
        }}"##,
    );
    let graph = session.graph();
    let root = session.driver().entry("Tree").unwrap();
    let tree = graph.node(root).as_object().unwrap();
    assert_eq!(tree.properties["parent"].ty, root);
    match &graph.node(tree.properties["children"].ty).kind {
        TypeKind::Array(array) => assert_eq!(array.element, root),
        other => panic!("unexpected {other:?}"),
    }

    let set = session.descriptors("Tree").unwrap();
    assert_eq!(set.len(), 1);
    let parent = set.by_name("Tree").unwrap().accessor("parent").unwrap();
    assert_eq!(
        parent.shape,
        ValueShape::Named {
            type_name: "Tree".to_string(),
            target: root
        }
    );

    let child = DynamicObject::new(set, graph, "Tree").unwrap();
    let ancestor = DynamicObject::new(set, graph, "Tree").unwrap();
    ancestor.set("set_label", "root").unwrap();
    child.set("set_parent", ancestor.bindings().clone()).unwrap();
    let read = child.get_object("parent").unwrap().unwrap();
    assert!(read.bindings().ptr_eq(ancestor.bindings()));
    assert_eq!(read.get("label").unwrap(), Some("root".into()));
}

const CATALOG: &str = r##"{"properties": {"wide": {"$ref": "#/definitions/X"}},
    "definitions": {
        "X": {"properties": {"a": {"type": "string"}, "b": {"type": "string"},
            "c": {"type": "string"}}},
        "Y": {"properties": {"a": {"type": "string"}, "b": {"type": "string"}}}}}"##;

#[test]
fn test_structural_cast_shares_binding() {
    let session = session_with("Catalog", CATALOG);
    let set = session.descriptors("Catalog").unwrap();
    let graph = session.graph();
    let x_id = set.by_name("X").unwrap().id;
    assert!(set.capabilities().satisfies(x_id, "Y"));
    assert!(!set.capabilities().satisfies(set.by_name("Y").unwrap().id, "X"));

    let x = DynamicObject::new(set, graph, "X").unwrap();
    let y = x.view_as("Y").unwrap();
    x.set("set_a", "written through x").unwrap();
    assert_eq!(y.get("a").unwrap(), Some("written through x".into()));
    y.set("set_b", "written through y").unwrap();
    assert_eq!(x.get("b").unwrap(), Some("written through y".into()));

    let code = RustRenderer::new().render(set);
    assert!(code.contains("pub fn as_y(&self) -> Y {"));
    assert!(code.contains("Y::from_bindings(self.bindings.clone())"));
}

#[test]
fn test_repeated_synthesis_is_idempotent() {
    init_tracing();
    let mut generator = Generator::new();
    generator.add_schema("Catalog", CATALOG).unwrap();
    let first = generator.generate("Catalog").unwrap();
    let slots = generator.session().graph().len();
    let second = generator.generate("Catalog").unwrap();

    assert_eq!(first, second);
    assert_eq!(generator.session().graph().len(), slots);
    assert_eq!(generator.session().phase("Catalog"), Phase::Done);

    let set = generator.session().descriptors("Catalog").unwrap();
    let x = set.by_name("X").unwrap();
    let getters = x.accessors_of(AccessorKind::Getter).count();
    assert_eq!(getters, 3);
    assert_eq!(first.matches("pub struct X {").count(), 1);
}

#[test]
fn test_generated_code_for_person() {
    let code = generate_from_str("Person", PERSON).unwrap();
    assert!(code.contains("pub fn create(name: String) -> Self {"));
    assert!(code.contains("created.bindings.put(\"Name\", jsonbind::StringCodec::encode(&name));"));
    assert!(code.contains("pub fn name(&self) -> Result<String, jsonbind::FormatError> {"));
}

#[test]
fn test_accessor_format_errors_surface_at_read() {
    let session = session_with(
        "Event",
        r#"{"properties": {"at": {"type": "integer", "format": "utc-millisec"}}}"#,
    );
    let set = session.descriptors("Event").unwrap();
    let event = DynamicObject::new(set, session.graph(), "Event").unwrap();
    event.bindings().put("at", "yesterday");
    assert!(matches!(event.get("at"), Err(AccessError::Format(_))));
}
