//! Round-trip stability tests
//!
//! Wrapping a recognized value and re-wrapping the result against the
//! same type descriptor must be idempotent, except where documented
//! normalization changes representation (address checksumming, bytes
//! zero-padding, string re-encoding).

use lib_abi_types::{
    DataType, FunctionKind, Member, UserDefinedType, UserDefinedTypes, Value, WrappedResult,
    WrappedValue,
};
use lib_abi_wrap::{wrap, NullResolver, WrapOptions};

const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

fn rewrap(ty: &DataType, first: WrappedValue, types: &UserDefinedTypes) -> WrappedValue {
    let opts = WrapOptions::new(types);
    let reinput = Value::Wrapped(Box::new(WrappedResult::Value(first)));
    wrap(ty, &reinput, &opts, &mut NullResolver).expect("re-wrap should succeed")
}

fn assert_roundtrip(ty: DataType, input: Value, types: &UserDefinedTypes) {
    let opts = WrapOptions::new(types);
    let first = wrap(&ty, &input, &opts, &mut NullResolver).expect("first wrap should succeed");
    let second = rewrap(&ty, first.clone(), types);
    assert_eq!(first, second, "re-wrap changed the value for {}", ty);
}

#[test]
fn test_bool_roundtrip() {
    let types = UserDefinedTypes::new();
    assert_roundtrip(DataType::Bool, Value::from(true), &types);
}

#[test]
fn test_integer_roundtrip() {
    let types = UserDefinedTypes::new();
    assert_roundtrip(DataType::uint(256), Value::from("1 ether"), &types);
    assert_roundtrip(DataType::int(8), Value::from(-128), &types);
}

#[test]
fn test_decimal_roundtrip() {
    let types = UserDefinedTypes::new();
    assert_roundtrip(DataType::fixed_default(), Value::from("1.5"), &types);
}

#[test]
fn test_bytes_roundtrip_after_padding() {
    let types = UserDefinedTypes::new();
    // Padding happens on the first wrap; the second is a fixed point
    assert_roundtrip(DataType::bytes_static(4), Value::from("0xff"), &types);
    assert_roundtrip(DataType::bytes_dynamic(), Value::from("0xdeadbeef"), &types);
}

#[test]
fn test_address_roundtrip_after_checksumming() {
    let types = UserDefinedTypes::new();
    // Checksumming happens on the first wrap
    assert_roundtrip(
        DataType::address(),
        Value::from(CHECKSUMMED.to_ascii_lowercase().as_str()),
        &types,
    );
}

#[test]
fn test_string_roundtrip() {
    let types = UserDefinedTypes::new();
    assert_roundtrip(DataType::String, Value::from("hello"), &types);
}

#[test]
fn test_enum_roundtrip() {
    let mut types = UserDefinedTypes::new();
    types.insert(
        "Color",
        UserDefinedType::Enum {
            name: "Color".to_string(),
            defining_contract: None,
            options: vec!["Red".to_string(), "Green".to_string()],
        },
    );
    assert_roundtrip(
        DataType::Enum {
            id: "Color".to_string(),
        },
        Value::from("Green"),
        &types,
    );
}

#[test]
fn test_function_roundtrip() {
    let types = UserDefinedTypes::new();
    let ty = DataType::FunctionExternal {
        function: FunctionKind::General,
    };
    let record = Value::record([
        ("address", Value::from(CHECKSUMMED)),
        ("selector", Value::from("0xdeadbeef")),
    ]);
    assert_roundtrip(ty, record, &types);
}

#[test]
fn test_container_roundtrip() {
    let types = UserDefinedTypes::new();
    let array = DataType::Array {
        element: Box::new(DataType::uint(8)),
        length: None,
    };
    assert_roundtrip(
        array,
        Value::Sequence(vec![Value::from(1), Value::from(2)]),
        &types,
    );

    let tuple = DataType::Tuple {
        members: vec![
            Member::named("flag", DataType::Bool),
            Member::named("count", DataType::uint(8)),
        ],
    };
    assert_roundtrip(
        tuple,
        Value::record([("flag", Value::from(true)), ("count", Value::from(3))]),
        &types,
    );
}
