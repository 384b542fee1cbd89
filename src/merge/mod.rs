//! Structural deep merge for tracking payloads and options.
//!
//! Merge semantics, applied key by key from left to right:
//! - Arrays: concatenated (incoming appended after accumulated)
//! - Objects: deep-merged by key (recursive)
//! - Anything else: incoming replaces accumulated

use serde_json::{Map, Value};

/// A JSON object used for payloads, options and their per-event tables.
pub type Fields = Map<String, Value>;

/// Merge any number of values into a new object without touching the inputs.
///
/// `Null` inputs are skipped. Array inputs contribute their elements under
/// index keys ("0", "1", ...). Other top-level scalars contribute nothing.
pub fn deep_merge<'a, I>(inputs: I) -> Fields
where
	I: IntoIterator<Item = &'a Value>,
{
	inputs.into_iter().fold(Fields::new(), |mut merged, input| {
		match input {
			Value::Object(fields) => merge_into(&mut merged, fields),
			Value::Array(items) => {
				for (index, item) in items.iter().enumerate() {
					merge_value(&mut merged, &index.to_string(), item);
				}
			}
			_ => {}
		}
		merged
	})
}

/// Merge already-typed objects in order. Absent entries are skipped.
pub fn merge_fields(inputs: &[Option<&Fields>]) -> Fields {
	let mut merged = Fields::new();
	for fields in inputs.iter().flatten() {
		merge_into(&mut merged, fields);
	}
	merged
}

fn merge_into(merged: &mut Fields, incoming: &Fields) {
	for (key, value) in incoming {
		merge_value(merged, key, value);
	}
}

fn merge_value(merged: &mut Fields, key: &str, incoming: &Value) {
	// Everything already in `merged` is an owned copy, so it can be extended in place.
	let value = match (merged.remove(key), incoming) {
		(Some(Value::Array(mut existing)), Value::Array(items)) => {
			existing.extend(items.iter().cloned());
			Value::Array(existing)
		}
		(Some(Value::Object(mut existing)), Value::Object(fields)) => {
			merge_into(&mut existing, fields);
			Value::Object(existing)
		}
		_ => incoming.clone(),
	};
	merged.insert(key.to_owned(), value);
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_skips_null_inputs() {
		let result = deep_merge([&Value::Null, &json!({"a": 1}), &Value::Null]);
		assert_eq!(Value::Object(result), json!({"a": 1}));
	}

	#[test]
	fn test_all_absent_is_empty() {
		assert!(deep_merge([&Value::Null, &Value::Null]).is_empty());
		assert!(deep_merge(std::iter::empty::<&Value>()).is_empty());
		assert!(merge_fields(&[None, None]).is_empty());
	}

	#[test]
	fn test_nested_objects_and_arrays() {
		let first = json!({
			"a": {
				"b": {
					"c": {"d": 1, "e": [{"z": 1}]},
					"f": {"g": [1, 11, 111]}
				},
				"h": {"i": 1}
			},
			"j": 1
		});
		let second = json!({
			"a": {
				"b": {
					"c": {"e": [{"x": 2}]},
					"f": {"g": [2, 22]}
				},
				"k": {"l": 2}
			},
			"j": 2
		});

		let result = deep_merge([&first, &second]);

		assert_eq!(
			Value::Object(result),
			json!({
				"a": {
					"b": {
						"c": {"d": 1, "e": [{"z": 1}, {"x": 2}]},
						"f": {"g": [1, 11, 111, 2, 22]}
					},
					"h": {"i": 1},
					"k": {"l": 2}
				},
				"j": 2
			})
		);
	}

	#[test]
	fn test_mismatched_types_replace() {
		let first = json!({
			"a": "some string",
			"b": ["a", "r", "r"],
			"c": {"d": 1, "e": 1}
		});
		let second = json!({
			"a": 2,
			"b": "hello",
			"c": {"d": 2}
		});

		let result = deep_merge([&first, &second]);

		assert_eq!(
			Value::Object(result),
			json!({"a": 2, "b": "hello", "c": {"d": 2, "e": 1}})
		);
	}

	#[test]
	fn test_object_replaced_by_array_and_back() {
		let result = deep_merge([&json!({"k": {"a": 1}}), &json!({"k": [1]})]);
		assert_eq!(result["k"], json!([1]));

		let result = deep_merge([&json!({"k": [1]}), &json!({"k": {"a": 1}})]);
		assert_eq!(result["k"], json!({"a": 1}));
	}

	#[test]
	fn test_array_concat_keeps_duplicates() {
		let result = deep_merge([&json!({"k": [1, 2]}), &json!({"k": [2, 1]})]);
		assert_eq!(result["k"], json!([1, 2, 2, 1]));
	}

	#[test]
	fn test_top_level_array_uses_index_keys() {
		let result = deep_merge([&json!(["x", "y"]), &json!({"1": "z"})]);
		assert_eq!(Value::Object(result), json!({"0": "x", "1": "z"}));
	}

	#[test]
	fn test_top_level_scalars_contribute_nothing() {
		let result = deep_merge([&json!({"a": 1}), &json!("text"), &json!(42)]);
		assert_eq!(Value::Object(result), json!({"a": 1}));
	}

	#[test]
	fn test_inputs_are_not_mutated() {
		let first = json!({"a": {"b": [1]}, "c": 1});
		let second = json!({"a": {"b": [2], "d": 2}});
		let first_before = first.clone();
		let second_before = second.clone();

		let mut result = deep_merge([&first, &second]);
		result.insert("c".into(), json!("changed"));
		if let Some(Value::Object(a)) = result.get_mut("a") {
			a.insert("b".into(), json!([]));
		}

		assert_eq!(first, first_before);
		assert_eq!(second, second_before);
	}

	#[test]
	fn test_repeated_calls_are_equal() {
		let first = json!({"a": {"b": 1}, "list": [1]});
		let second = json!({"a": {"c": 2}, "list": [2]});
		assert_eq!(deep_merge([&first, &second]), deep_merge([&first, &second]));
	}

	#[test]
	fn test_associative() {
		let a = json!({"x": {"y": [1], "z": 1}, "s": "a", "m": {"n": 1}});
		let b = json!({"x": {"y": [2], "w": 2}, "s": {"t": 1}, "m": "flat"});
		let c = json!({"x": {"y": [3], "z": 3}, "s": {"u": 2}, "m": {"o": 3}});

		let all_at_once = deep_merge([&a, &b, &c]);
		let left_first = Value::Object(deep_merge([&a, &b]));
		let stepwise = deep_merge([&left_first, &c]);

		assert_eq!(all_at_once, stepwise);
	}

	#[test]
	fn test_merge_fields_later_wins() {
		let mut first = Fields::new();
		first.insert("location".into(), json!("bottom"));
		first.insert("zombie".into(), json!("walking"));
		let mut second = Fields::new();
		second.insert("location".into(), json!("top"));

		let result = merge_fields(&[Some(&first), None, Some(&second)]);

		assert_eq!(
			Value::Object(result),
			json!({"location": "top", "zombie": "walking"})
		);
	}
}
