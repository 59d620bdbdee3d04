//! `roundtrip` 集成测试：内建形态在全部标签量级边界上的编码—解码往返。
//!
//! # 测试总览（Why）
//! - 整数阶梯的每一级边界（上一级最大值与下一级最小值）都必须各走各的标签，
//!   且数值往返不变；
//! - 文本、二进制、序列与映射在长度字段切换点（31/32、255/256、65535/65536）
//!   两侧各取一例；
//! - “无值”标记与显式空值是两个不同的值，往返后仍可区分。

use vellum_codec_msgpack::{Serializer, Value};

fn roundtrip(value: Value) -> Value {
    let s = Serializer::new();
    let bytes = s.encode(&value).expect("编码应成功");
    s.decode_slice(&bytes).expect("解码应成功")
}

fn assert_roundtrip(value: Value) {
    let back = roundtrip(value.clone());
    assert_eq!(back, value, "往返后值不一致");
}

/// 正整数阶梯：posfixint / uint8 / uint16 / uint32 / uint64 的边界值。
#[test]
fn positive_integer_ladder_boundaries() {
    for v in [
        0i64,
        1,
        127,                       // posfixint 上界
        128,                       // uint8 下界
        255,                       // uint8 上界
        256,                       // uint16 下界
        65_535,                    // uint16 上界
        65_536,                    // uint32 下界
        4_294_967_295,             // uint32 上界
        4_294_967_296,             // uint64 下界
        9_007_199_254_740_991,     // 2^53 − 1，整数标签的精确上界
    ] {
        assert_roundtrip(Value::Integer(v));
    }
}

/// 负整数阶梯：negfixint / int8 / int16 / int32 / int64 的边界值。
#[test]
fn negative_integer_ladder_boundaries() {
    for v in [
        -1i64,
        -32,                       // negfixint 下界
        -33,                       // int8 区间开始
        -128,                      // int8 下界
        -129,                      // int16 区间开始
        -32_768,                   // int16 下界
        -32_769,                   // int32 区间开始
        -2_147_483_648,            // int32 下界
        -2_147_483_649,            // int64 区间开始
        -9_007_199_254_740_991,    // −(2^53 − 1)，整数标签的精确下界
    ] {
        assert_roundtrip(Value::Integer(v));
    }
}

/// 越出 2^53 − 1 精确窗口的整数按双精度回退，往返后以浮点形态出现。
#[test]
fn integers_beyond_the_exact_window_come_back_as_floats() {
    let back = roundtrip(Value::Integer(9_007_199_254_740_992));
    assert_eq!(back, Value::Float(9_007_199_254_740_992.0));

    let back = roundtrip(Value::Integer(-9_007_199_254_740_992));
    assert_eq!(back, Value::Float(-9_007_199_254_740_992.0));
}

/// 浮点一律按双精度编码，位模式无损往返。
#[test]
fn floats_round_trip_exactly() {
    for v in [0.0f64, -0.0, 1.5, -2.25, 3.141592653589793, 1e300, f64::MIN_POSITIVE] {
        assert_roundtrip(Value::Float(v));
    }
}

/// 文本长度在 fixstr/str8/str16/str32 切换点两侧往返。
#[test]
fn string_length_boundaries() {
    for len in [0usize, 1, 31, 32, 255, 256, 65_535, 65_536] {
        assert_roundtrip(Value::Str("x".repeat(len)));
    }
}

/// 多字节 UTF-8 文本按字节长度选标签，内容无损往返。
#[test]
fn multibyte_utf8_strings_round_trip() {
    assert_roundtrip(Value::from("缓冲区编码"));
    assert_roundtrip(Value::from("héllo wörld"));
}

/// 二进制长度在 bin8/bin16/bin32 切换点两侧往返。
#[test]
fn binary_length_boundaries() {
    for len in [0usize, 1, 255, 256, 65_535, 65_536] {
        let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        assert_roundtrip(Value::from(payload));
    }
}

/// 序列长度在 fixarray/array16 切换点两侧往返，元素次序保持。
#[test]
fn array_length_boundaries() {
    for len in [0usize, 1, 15, 16, 1000] {
        let items: Vec<Value> = (0..len).map(|i| Value::Integer(i as i64)).collect();
        assert_roundtrip(Value::Array(items));
    }
}

/// 超过 16 位长度字段的序列走 array32 标签。
#[test]
fn large_arrays_use_the_32_bit_length_tag() {
    let items: Vec<Value> = (0..65_536).map(|i| Value::Integer(i % 100)).collect();
    assert_roundtrip(Value::Array(items));
}

/// 映射长度在 fixmap/map16 切换点两侧往返，插入顺序保持。
#[test]
fn map_length_boundaries() {
    for len in [0usize, 1, 15, 16, 1000] {
        let entries: Vec<(Value, Value)> = (0..len)
            .map(|i| (Value::Str(format!("k{i}")), Value::Integer(i as i64)))
            .collect();
        assert_roundtrip(Value::Map(entries));
    }
}

/// map16 长度字段的上界（65535 条目）仍可往返。
#[test]
fn map16_upper_bound_round_trips() {
    let entries: Vec<(Value, Value)> = (0..65_535)
        .map(|i| (Value::Integer(i), Value::Integer(i % 7)))
        .collect();
    assert_roundtrip(Value::Map(entries));
}

/// 映射键不限于字符串：整数键、嵌套序列键均可往返。
#[test]
fn map_keys_are_not_restricted_to_strings() {
    assert_roundtrip(Value::Map(vec![
        (Value::Integer(7), Value::from("seven")),
        (Value::Nil, Value::Bool(true)),
        (Value::Array(vec![Value::Integer(1)]), Value::Integer(2)),
    ]));
}

/// 重复键原样保留，不做去重。
#[test]
fn duplicate_map_keys_are_preserved() {
    let value = Value::Map(vec![
        (Value::from("k"), Value::Integer(1)),
        (Value::from("k"), Value::Integer(2)),
    ]);
    assert_roundtrip(value);
}

/// “无值”标记与显式空值往返后仍然可区分。
#[test]
fn undefined_and_nil_stay_distinct() {
    assert_roundtrip(Value::Undefined);
    assert_roundtrip(Value::Nil);
    assert_ne!(roundtrip(Value::Undefined), Value::Nil);
    assert_ne!(roundtrip(Value::Nil), Value::Undefined);
}

/// 布尔两个取值往返。
#[test]
fn booleans_round_trip() {
    assert_roundtrip(Value::Bool(true));
    assert_roundtrip(Value::Bool(false));
}

/// 深度嵌套的复合值整体往返。
#[test]
fn nested_composites_round_trip() {
    let value = Value::Map(vec![
        (
            Value::from("user"),
            Value::Map(vec![
                (Value::from("id"), Value::Integer(42)),
                (Value::from("name"), Value::from("艾丽")),
                (
                    Value::from("tags"),
                    Value::Array(vec![Value::from("a"), Value::from("b")]),
                ),
            ]),
        ),
        (Value::from("blob"), Value::from(vec![0u8, 1, 2, 3])),
        (Value::from("absent"), Value::Undefined),
        (Value::from("empty"), Value::Nil),
    ]);
    assert_roundtrip(value);
}
