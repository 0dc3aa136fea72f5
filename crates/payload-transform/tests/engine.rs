//! Tests for the recursive transformation engine.

use payload_model::{
    Decoded, FieldSpec, ObjectSchema, PayloadError, RawMap, RawValue, SchemaRegistry, TypeTag,
};
use payload_transform::TransformEngine;

/// Registry with the order-request shapes used across these tests.
fn order_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .register(ObjectSchema::new(
            "OrderItem",
            vec![FieldSpec::new("sku", TypeTag::String).build().unwrap()],
        ))
        .register(ObjectSchema::new(
            "CreateOrderRequest",
            vec![
                FieldSpec::new("name", TypeTag::String).build().unwrap(),
                FieldSpec::new("quantity", TypeTag::Int).build().unwrap(),
                FieldSpec::new("notes", TypeTag::String)
                    .optional()
                    .build()
                    .unwrap(),
                FieldSpec::new("items", TypeTag::ArrayObject)
                    .item_type("OrderItem")
                    .build()
                    .unwrap(),
            ],
        ))
        .build()
}

fn raw_map(value: serde_json::Value) -> RawMap {
    match RawValue::from(value) {
        RawValue::Map(map) => map,
        other => panic!("expected a map, got {other:?}"),
    }
}

#[test]
fn test_end_to_end_order_request() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);
    let input = raw_map(serde_json::json!({
        "name": " Widget ",
        "quantity": "3",
        "items": [{"sku": "X1"}],
    }));

    let object = engine
        .transform("CreateOrderRequest", &input)
        .unwrap()
        .unwrap();

    assert_eq!(object.shape(), "CreateOrderRequest");
    assert_eq!(object.get("name").and_then(Decoded::as_str), Some("Widget"));
    assert_eq!(object.get("quantity").and_then(Decoded::as_int), Some(3));
    assert!(object.get("notes").is_none());

    let items = object.get("items").and_then(Decoded::as_objects).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].shape(), "OrderItem");
    assert_eq!(items[0].get("sku").and_then(Decoded::as_str), Some("X1"));
}

#[test]
fn test_missing_required_field_reports_first_declared() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);

    // repeated runs report the same field
    for _ in 0..3 {
        let err = engine
            .transform("CreateOrderRequest", &RawMap::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Field 'name' is required.");
    }

    let err = engine
        .transform(
            "CreateOrderRequest",
            &raw_map(serde_json::json!({"name": "Widget", "quantity": "1"})),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Field 'items' is required.");
}

#[test]
fn test_null_value_counts_as_absent() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);
    let err = engine
        .transform(
            "CreateOrderRequest",
            &raw_map(serde_json::json!({"name": null})),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Field 'name' is required.");
}

#[test]
fn test_scalar_for_object_list_is_one_clean_error() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);
    let err = engine
        .transform(
            "CreateOrderRequest",
            &raw_map(serde_json::json!({
                "name": "Widget",
                "quantity": "3",
                "items": "oops",
            })),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "'items' must be a list.");
}

#[test]
fn test_empty_shape_name_is_noop() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);
    assert!(engine.transform("", &RawMap::new()).unwrap().is_none());
    assert!(engine.transform_list("", &[]).unwrap().is_none());
}

#[test]
fn test_unknown_shape_is_invalid_data() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);
    let err = engine.transform("MysteryShape", &RawMap::new()).unwrap_err();
    assert!(matches!(err, PayloadError::InvalidData(_)));
    assert_eq!(err.to_string(), "Unknown payload shape: 'MysteryShape'.");
}

#[test]
fn test_transform_list_decodes_each_element() {
    let registry = order_registry();
    let engine = TransformEngine::new(&registry);

    let input = vec![
        RawValue::from(serde_json::json!({"sku": "X1"})),
        RawValue::from(serde_json::json!({"sku": " X2 "})),
    ];
    let objects = engine.transform_list("OrderItem", &input).unwrap().unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1].get("sku").and_then(Decoded::as_str), Some("X2"));

    assert_eq!(
        engine.transform_list("OrderItem", &[]).unwrap().unwrap(),
        Vec::new()
    );

    let err = engine
        .transform_list("OrderItem", &[RawValue::from("scalar")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid type of value. Expected type: 'map', 'string' given."
    );
}

#[test]
fn test_lookup_name_override_and_attribute_fallback() {
    let registry = SchemaRegistry::builder()
        .register(ObjectSchema::new(
            "RenameRequest",
            vec![
                FieldSpec::new("customer_name", TypeTag::String)
                    .name("customerName")
                    .build()
                    .unwrap(),
                FieldSpec::new("code", TypeTag::Int).build().unwrap(),
            ],
        ))
        .build();
    let engine = TransformEngine::new(&registry);

    // `code` resolves through the reserved attribute sub-map
    let input = raw_map(serde_json::json!({
        "customerName": "Ada",
        "@attributes": {"code": "7"},
    }));
    let object = engine.transform("RenameRequest", &input).unwrap().unwrap();
    assert_eq!(
        object.get("customer_name").and_then(Decoded::as_str),
        Some("Ada")
    );
    assert_eq!(object.get("code").and_then(Decoded::as_int), Some(7));
}

#[test]
fn test_nested_object_field() {
    let registry = SchemaRegistry::builder()
        .register(ObjectSchema::new(
            "Address",
            vec![FieldSpec::new("city", TypeTag::String).build().unwrap()],
        ))
        .register(ObjectSchema::new(
            "Customer",
            vec![
                FieldSpec::new("address", TypeTag::Object)
                    .item_type("Address")
                    .build()
                    .unwrap(),
            ],
        ))
        .build();
    let engine = TransformEngine::new(&registry);

    let object = engine
        .transform(
            "Customer",
            &raw_map(serde_json::json!({"address": {"city": "Oslo"}})),
        )
        .unwrap()
        .unwrap();
    let address = object.get("address").and_then(Decoded::as_object).unwrap();
    assert_eq!(address.get("city").and_then(Decoded::as_str), Some("Oslo"));

    let err = engine
        .transform(
            "Customer",
            &raw_map(serde_json::json!({"address": "Oslo"})),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "'address' must be a map.");
}

fn wrapped_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .register(ObjectSchema::new(
            "Entry",
            vec![FieldSpec::new("a", TypeTag::Int).build().unwrap()],
        ))
        .register(ObjectSchema::new(
            "WrappedRequest",
            vec![
                FieldSpec::new("field", TypeTag::ArrayObjectXml)
                    .item_type("Entry")
                    .xml_wrapper("wrap")
                    .build()
                    .unwrap(),
            ],
        ))
        .build()
}

#[test]
fn test_xml_wrapped_list_decodes_every_element() {
    let registry = wrapped_registry();
    let engine = TransformEngine::new(&registry);

    let object = engine
        .transform(
            "WrappedRequest",
            &raw_map(serde_json::json!({"field": {"wrap": [{"a": 1}, {"a": 2}]}})),
        )
        .unwrap()
        .unwrap();

    let entries = object.get("field").and_then(Decoded::as_objects).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].get("a").and_then(Decoded::as_int), Some(1));
    assert_eq!(entries[1].get("a").and_then(Decoded::as_int), Some(2));
}

#[test]
fn test_xml_single_child_collapse() {
    let registry = wrapped_registry();
    let engine = TransformEngine::new(&registry);

    // a single logical child arrives without an enclosing list; the whole
    // wrapper map is the one object and its attributes resolve the field
    let object = engine
        .transform(
            "WrappedRequest",
            &raw_map(serde_json::json!({"field": {"wrap": {"@attributes": {"a": "1"}}}})),
        )
        .unwrap()
        .unwrap();

    let entries = object.get("field").and_then(Decoded::as_objects).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("a").and_then(Decoded::as_int), Some(1));
}

#[test]
fn test_xml_missing_wrapper_key_is_empty() {
    let registry = wrapped_registry();
    let engine = TransformEngine::new(&registry);

    let object = engine
        .transform(
            "WrappedRequest",
            &raw_map(serde_json::json!({"field": {"other": []}})),
        )
        .unwrap()
        .unwrap();
    assert_eq!(
        object.get("field").and_then(Decoded::as_objects),
        Some(&[][..])
    );
}

#[test]
fn test_localized_objects_drop_ru() {
    let registry = SchemaRegistry::builder()
        .register(ObjectSchema::new(
            "Title",
            vec![FieldSpec::new("text", TypeTag::String).build().unwrap()],
        ))
        .register(ObjectSchema::new(
            "LocalizedRequest",
            vec![
                FieldSpec::new("titles", TypeTag::ArrayObjectI18n)
                    .item_type("Title")
                    .build()
                    .unwrap(),
            ],
        ))
        .build();
    let engine = TransformEngine::new(&registry);

    let object = engine
        .transform(
            "LocalizedRequest",
            &raw_map(serde_json::json!({
                "titles": {
                    "en": {"text": "Hello"},
                    "DE": {"text": "Hallo"},
                    "ru": {"text": "dropped"},
                },
            })),
        )
        .unwrap()
        .unwrap();

    let Some(Decoded::ObjectMap(titles)) = object.get("titles") else {
        panic!("expected localized objects");
    };
    // original locale keys survive untouched; the dropped one is gone
    assert_eq!(
        titles.keys().collect::<Vec<_>>(),
        vec![&"DE".to_string(), &"en".to_string()]
    );
    assert_eq!(
        titles["en"].get("text").and_then(Decoded::as_str),
        Some("Hello")
    );
}

#[test]
fn test_concurrent_transforms_share_one_registry() {
    let registry = order_registry();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let registry = &registry;
                scope.spawn(move || {
                    let engine = TransformEngine::new(registry);
                    let input = raw_map(serde_json::json!({
                        "name": format!("Widget {worker}"),
                        "quantity": worker.to_string(),
                        "items": [],
                    }));
                    engine
                        .transform("CreateOrderRequest", &input)
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            let object = handle.join().unwrap();
            assert_eq!(
                object.get("name").and_then(Decoded::as_str),
                Some(format!("Widget {worker}").as_str())
            );
            assert_eq!(
                object.get("quantity").and_then(Decoded::as_int),
                Some(worker as i64)
            );
        }
    });
}
