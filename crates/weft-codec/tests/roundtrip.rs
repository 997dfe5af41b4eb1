//! Round-trip and determinism properties for the default adaptor set.

use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};
use weft_codec::Squeezer;

fn value_strategy() -> impl Strategy<Value = Value> {
	let leaf = prop_oneof![
		Just(Value::Null),
		any::<bool>().prop_map(Value::Bool),
		any::<i64>().prop_map(Value::from),
		any::<u64>().prop_map(Value::from),
		prop::num::f64::NORMAL.prop_map(Value::from),
		".*".prop_map(Value::from),
	];
	leaf.prop_recursive(3, 24, 5, |inner| {
		prop_oneof![
			prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
			prop::collection::btree_map(".*", inner, 0..5)
				.prop_map(|m| Value::Object(m.into_iter().collect())),
		]
	})
}

proptest! {
	#[test]
	fn squeeze_then_unsqueeze_is_identity(value in value_strategy()) {
		let squeezer = Squeezer::new();
		let token = squeezer.squeeze(&value)?;
		prop_assert_eq!(squeezer.unsqueeze(&token)?, value);
	}

	#[test]
	fn equal_values_produce_equal_tokens(value in value_strategy()) {
		let squeezer = Squeezer::new();
		prop_assert_eq!(squeezer.squeeze(&value)?, squeezer.squeeze(&value.clone())?);
	}
}

#[rstest]
#[case(json!(null), "X")]
#[case(json!(true), "T")]
#[case(json!(false), "F")]
#[case(json!(42), "i42")]
#[case(json!(-1), "i-1")]
#[case(json!("hello"), "Shello")]
fn scalar_tokens_are_stable(#[case] value: Value, #[case] expected: &str) {
	let squeezer = Squeezer::new();
	assert_eq!(squeezer.squeeze(&value).unwrap(), expected);
	assert_eq!(squeezer.unsqueeze(expected).unwrap(), value);
}

#[test]
fn tokens_survive_hostile_strings() {
	let squeezer = Squeezer::new();
	for s in ["", "X", "i42", "J!!", "\"quoted\" & <tagged>", "multi\nline"] {
		let value = Value::String(s.to_string());
		let token = squeezer.squeeze(&value).unwrap();
		assert_eq!(squeezer.unsqueeze(&token).unwrap(), value);
	}
}
