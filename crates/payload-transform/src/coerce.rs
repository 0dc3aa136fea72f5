//! Scalar and array coercion rules.
//!
//! One rule per leaf type tag, each a pure function of the raw value and the
//! field metadata. A shape mismatch raises invalid-data naming the expected
//! tag and the shape actually given. Nested-object tags never arrive here;
//! the engine dispatches them before delegating.
//!
//! Two deliberately permissive rules are kept for client compatibility: the
//! numeric casts take the leading numeric prefix of a string and fall back
//! to zero, and strings are truthy unless they equal `false`
//! (case-insensitively), `0`, or the empty string.

use std::collections::BTreeMap;

use payload_model::{
    Decoded, DecodedVariant, FieldSpec, PayloadError, RawValue, Result, TypeTag, VariantRegistry,
    VariantSet,
};

use crate::DROPPED_LOCALE;
use crate::datetime;

/// Decode a leaf value per its field's type tag.
pub fn coerce(
    spec: &FieldSpec,
    value: &RawValue,
    variants: Option<&VariantRegistry>,
) -> Result<Decoded> {
    match spec.tag() {
        TypeTag::String => coerce_string(value),
        TypeTag::StringI18n => coerce_string_i18n(spec, value),
        TypeTag::Date => coerce_date(spec, value),
        TypeTag::Datetime => coerce_datetime(spec, value),
        TypeTag::Time => coerce_time(value),
        TypeTag::Int => coerce_int(value),
        TypeTag::Float => coerce_float(value),
        TypeTag::Bool => coerce_bool(value),
        TypeTag::File => coerce_file(value),
        TypeTag::Enum => coerce_enum(spec, value, variants),
        TypeTag::Array => coerce_array(value),
        TypeTag::ArrayString => coerce_array_string(value),
        TypeTag::ArrayInt => coerce_array_int(value),
        TypeTag::ArrayFile => coerce_array_file(value),
        TypeTag::ArrayEnum => coerce_array_enum(spec, value, variants),
        tag @ (TypeTag::Object
        | TypeTag::ArrayObject
        | TypeTag::ArrayObjectXml
        | TypeTag::ArrayObjectI18n) => Err(PayloadError::invalid_data(format!(
            "Type '{tag}' is not supported."
        ))),
    }
}

fn type_mismatch(expected: &str, value: &RawValue) -> PayloadError {
    PayloadError::invalid_data(format!(
        "Invalid type of value. Expected type: '{expected}', '{}' given.",
        value.kind()
    ))
}

fn coerce_string(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => {
            Err(type_mismatch("string", value))
        }
        other => Ok(Decoded::String(stringify(other).trim().to_string())),
    }
}

/// Display-style rendering of a scalar.
fn stringify(value: &RawValue) -> String {
    match value {
        RawValue::Null => String::new(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Number(n) => format!("{n}"),
        RawValue::String(s) => s.clone(),
        // containers and files are rejected before stringification
        RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => String::new(),
    }
}

fn coerce_string_i18n(spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
    let RawValue::Map(entries) = value else {
        return Err(PayloadError::invalid_data(format!(
            "'{}' should be a map of locale keys, '{}' given.",
            spec.lookup_key(),
            value.kind()
        )));
    };

    let mut localized = BTreeMap::new();
    for (locale, item) in entries {
        if locale == DROPPED_LOCALE {
            continue;
        }
        let RawValue::String(text) = item else {
            return Err(type_mismatch("string", item));
        };
        localized.insert(locale.to_lowercase(), text.trim().to_string());
    }
    Ok(Decoded::I18nStrings(localized))
}

fn coerce_date(spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
    if is_blank(value) {
        return Ok(Decoded::Null);
    }
    let RawValue::String(text) = value else {
        return Err(type_mismatch("date", value));
    };
    let format = spec.date_format().unwrap_or(datetime::DEFAULT_DATE_FORMAT);
    datetime::parse_date(text, format)
        .map(Decoded::Date)
        .ok_or_else(|| {
            PayloadError::invalid_data(format!(
                "Invalid date format. Expected format: '{format}', '{text}' given."
            ))
        })
}

fn coerce_datetime(spec: &FieldSpec, value: &RawValue) -> Result<Decoded> {
    if is_blank(value) {
        return Ok(Decoded::Null);
    }
    let RawValue::String(text) = value else {
        return Err(type_mismatch("datetime", value));
    };
    let format = spec
        .date_format()
        .unwrap_or(datetime::DEFAULT_DATETIME_FORMAT);
    datetime::parse_datetime(text, format)
        .map(Decoded::DateTime)
        .ok_or_else(|| {
            PayloadError::invalid_data(format!(
                "Invalid datetime format. Expected format: '{format}', '{text}' given."
            ))
        })
}

fn coerce_time(value: &RawValue) -> Result<Decoded> {
    if is_blank(value) {
        return Ok(Decoded::Null);
    }
    let RawValue::String(text) = value else {
        return Err(type_mismatch("time", value));
    };
    datetime::parse_time(text).map(Decoded::Time).ok_or_else(|| {
        PayloadError::invalid_data(format!(
            "Invalid time format. Expected format: 'HH:MM', '{text}' given."
        ))
    })
}

/// Null and blank strings decode to null for the temporal tags.
fn is_blank(value: &RawValue) -> bool {
    match value {
        RawValue::Null => true,
        RawValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_int(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => Err(type_mismatch("int", value)),
        other => Ok(Decoded::Int(cast_int(other))),
    }
}

fn coerce_float(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => {
            Err(type_mismatch("float", value))
        }
        other => Ok(Decoded::Float(cast_float(other))),
    }
}

/// Permissive integer cast: truncated numbers, `true`/`false` as 1/0, the
/// leading numeric prefix of strings; anything else is 0.
fn cast_int(value: &RawValue) -> i64 {
    cast_float(value) as i64
}

fn cast_float(value: &RawValue) -> f64 {
    match value {
        RawValue::Number(n) => *n,
        RawValue::Bool(b) => f64::from(u8::from(*b)),
        RawValue::String(s) => numeric_prefix(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Longest leading numeric prefix of a trimmed string, including fraction
/// and exponent parts.
fn numeric_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;

    if !bytes.is_empty() && matches!(bytes[0], b'+' | b'-') {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut cursor = end + 1;
        let mut fraction_digits = false;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
            fraction_digits = true;
        }
        if fraction_digits || seen_digit {
            end = cursor;
            seen_digit = seen_digit || fraction_digits;
        }
    }
    if !seen_digit {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let mut exponent_digits = false;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
            exponent_digits = true;
        }
        if exponent_digits {
            end = cursor;
        }
    }
    trimmed[..end].parse::<f64>().ok()
}

fn coerce_bool(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => {
            Err(type_mismatch("bool", value))
        }
        RawValue::Bool(b) => Ok(Decoded::Bool(*b)),
        RawValue::String(s) => Ok(Decoded::Bool(truthy(s))),
        RawValue::Number(n) => Ok(Decoded::Bool(*n != 0.0)),
        RawValue::Null => Ok(Decoded::Bool(false)),
    }
}

/// Truthy unless the literal `false` (any case), `0`, or the empty string.
fn truthy(text: &str) -> bool {
    !(text.eq_ignore_ascii_case("false") || text.is_empty() || text == "0")
}

fn coerce_file(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::File(file) => Ok(Decoded::File(file.clone())),
        other => Err(type_mismatch("file", other)),
    }
}

fn coerce_enum(
    spec: &FieldSpec,
    value: &RawValue,
    variants: Option<&VariantRegistry>,
) -> Result<Decoded> {
    if matches!(value, RawValue::List(_) | RawValue::Map(_)) {
        return Err(type_mismatch("enum", value));
    }
    let set = backed_set(spec, variants, "enum")?;
    let case = set.decode(value)?;
    Ok(Decoded::Variant(DecodedVariant {
        set: set.name().to_string(),
        name: case.name.clone(),
    }))
}

/// The registered backed-variant set named by a field's `item_type`.
fn backed_set<'a>(
    spec: &FieldSpec,
    variants: Option<&'a VariantRegistry>,
    tag: &str,
) -> Result<&'a VariantSet> {
    spec.item_type()
        .and_then(|name| variants?.get(name))
        .ok_or_else(|| {
            PayloadError::invalid_data(format!(
                "A backed-variant 'item_type' is expected for field with type: '{tag}'."
            ))
        })
}

fn coerce_array(value: &RawValue) -> Result<Decoded> {
    match value {
        RawValue::List(_) | RawValue::Map(_) => Ok(Decoded::Untyped(value.clone())),
        other => Err(type_mismatch("array", other)),
    }
}

/// Elements of a list, or the values of a map; form and XML sources deliver
/// both container shapes.
fn container_elements<'v>(tag: &str, value: &'v RawValue) -> Result<Vec<&'v RawValue>> {
    match value {
        RawValue::List(items) => Ok(items.iter().collect()),
        RawValue::Map(entries) => Ok(entries.values().collect()),
        other => Err(type_mismatch(tag, other)),
    }
}

fn coerce_array_string(value: &RawValue) -> Result<Decoded> {
    let mut items = Vec::new();
    for element in container_elements("array_string", value)? {
        match element {
            RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => {
                return Err(type_mismatch("string", element));
            }
            other => items.push(stringify(other).trim().to_string()),
        }
    }
    Ok(Decoded::Strings(items))
}

fn coerce_array_int(value: &RawValue) -> Result<Decoded> {
    let mut items = Vec::new();
    for element in container_elements("array_int", value)? {
        match element {
            RawValue::List(_) | RawValue::Map(_) | RawValue::File(_) => {
                return Err(type_mismatch("int", element));
            }
            other => items.push(cast_int(other)),
        }
    }
    Ok(Decoded::Ints(items))
}

fn coerce_array_file(value: &RawValue) -> Result<Decoded> {
    let mut files = Vec::new();
    for element in container_elements("array_file", value)? {
        let RawValue::File(file) = element else {
            return Err(type_mismatch("file", element));
        };
        files.push(file.clone());
    }
    Ok(Decoded::Files(files))
}

fn coerce_array_enum(
    spec: &FieldSpec,
    value: &RawValue,
    variants: Option<&VariantRegistry>,
) -> Result<Decoded> {
    let elements = container_elements("array_enum", value)?;
    let set = backed_set(spec, variants, "array_enum")?;

    let mut cases = Vec::with_capacity(elements.len());
    for element in elements {
        if matches!(element, RawValue::List(_) | RawValue::Map(_)) {
            return Err(type_mismatch("enum", element));
        }
        let case = set.decode(element)?;
        cases.push(DecodedVariant {
            set: set.name().to_string(),
            name: case.name.clone(),
        });
    }
    Ok(Decoded::Variants(cases))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("5"), Some(5.0));
        assert_eq!(numeric_prefix("  -2.7kg "), Some(-2.7));
        assert_eq!(numeric_prefix(".5"), Some(0.5));
        assert_eq!(numeric_prefix("1.9abc"), Some(1.9));
        assert_eq!(numeric_prefix("5e3rest"), Some(5000.0));
        assert_eq!(numeric_prefix("abc"), None);
        assert_eq!(numeric_prefix("."), None);
        assert_eq!(numeric_prefix("-"), None);
    }

    #[test]
    fn test_truthy() {
        assert!(truthy("TRUE"));
        assert!(truthy("anything"));
        assert!(!truthy("false"));
        assert!(!truthy("FALSE"));
        assert!(!truthy("0"));
        assert!(!truthy(""));
    }
}
