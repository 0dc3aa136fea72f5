//! Tests for the validation adapter and group-key derivation.

use payload_model::{DecodedObject, PayloadError};
use payload_validate::{ValidationAdapter, Validator, Violation, group_key};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

/// Stub validator returning a fixed violation list, recording nothing.
struct StubValidator {
    violations: Vec<Violation>,
}

impl Validator for StubValidator {
    fn validate(&self, _object: &DecodedObject, _groups: &[&str]) -> Vec<Violation> {
        self.violations.clone()
    }
}

fn order_object() -> DecodedObject {
    DecodedObject::builder("CreateOrderRequest").finish()
}

#[test]
fn test_zero_violations_pass() {
    let adapter = ValidationAdapter::new(StubValidator {
        violations: Vec::new(),
    });
    assert!(adapter.validate(&order_object(), &[]).is_ok());
}

#[test]
fn test_violations_group_under_derived_key() {
    let adapter = ValidationAdapter::new(StubValidator {
        violations: vec![
            Violation::new("name", "This value is too short.")
                .with_invalid_value(serde_json::json!("x")),
            Violation::new("quantity", "This value should be positive."),
        ],
    });

    let err = adapter.validate(&order_object(), &[]).unwrap_err();
    let PayloadError::ValidationFailed(report) = err else {
        panic!("expected a validation failure");
    };

    let errors = report.group("CREATE_ORDER_REQUEST");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].parameter, "name");
    assert_eq!(errors[0].error, "This value is too short.");
    assert_eq!(errors[0].value, Some(serde_json::json!("x")));
    assert_eq!(errors[1].parameter, "quantity");
    assert_eq!(errors[1].value, None);
    assert_eq!(report.total(), 2);
}

#[test]
fn test_group_key_is_pure_function_of_shape_name() {
    assert_eq!(group_key("CreateOrderRequest"), "CREATE_ORDER_REQUEST");
    assert_eq!(group_key("CreateOrderRequest"), group_key("CreateOrderRequest"));
    assert_eq!(
        group_key("CreateOrderRequestException"),
        "CREATE_ORDER_REQUEST"
    );
}

proptest! {
    #[test]
    fn group_key_is_deterministic(name in "[A-Za-z ]{0,24}") {
        prop_assert_eq!(group_key(&name), group_key(&name));
    }

    #[test]
    fn group_key_never_starts_with_underscore(name in "[A-Za-z][A-Za-z ]{0,23}") {
        prop_assert!(!group_key(&name).starts_with('_'));
    }
}
