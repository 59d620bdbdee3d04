//! `wire_format` 集成测试：逐字节核对线格式输出与两条策略拒绝路径。
//!
//! # 测试总览（Why）
//! - 标签表是跨实现互通的根基，代表性编码必须逐字节精确；
//! - 0xDF（4 字节长度映射）在编码侧不产生、在解码侧被拒绝，两侧都要钉死。

use vellum_codec_msgpack::{Serializer, Value, codes};

fn encode_hex(value: Value) -> String {
    let s = Serializer::new();
    hex::encode(s.encode(&value).expect("编码应成功"))
}

/// 一万亿（1e12）走 uint64 标签而非双精度：0xCF + 8 字节大端。
#[test]
fn one_trillion_uses_the_uint64_tag() {
    assert_eq!(encode_hex(Value::Integer(1_000_000_000_000)), "cf000000e8d4a51000");
}

/// 两键字符串映射的规范编码：fixmap(2) + fixstr 键 + posfixint 值。
#[test]
fn small_string_map_canonical_bytes() {
    let value = Value::Map(vec![
        (Value::from("a"), Value::Integer(1)),
        (Value::from("b"), Value::Integer(2)),
    ]);
    assert_eq!(encode_hex(value), "82a16101a16202");
}

/// 标量标签逐字节核对。
#[test]
fn scalar_tags_are_byte_exact() {
    assert_eq!(encode_hex(Value::Nil), "c0");
    assert_eq!(encode_hex(Value::Bool(false)), "c2");
    assert_eq!(encode_hex(Value::Bool(true)), "c3");
    assert_eq!(encode_hex(Value::Integer(0)), "00");
    assert_eq!(encode_hex(Value::Integer(127)), "7f");
    assert_eq!(encode_hex(Value::Integer(128)), "cc80");
    assert_eq!(encode_hex(Value::Integer(-1)), "ff");
    assert_eq!(encode_hex(Value::Integer(-32)), "e0");
    assert_eq!(encode_hex(Value::Integer(-33)), "d0df");
    assert_eq!(encode_hex(Value::Float(1.5)), "cb3ff8000000000000");
}

/// “无值”标记的规范编码：fixext-1 + 类型号 0 + 单个零字节。
#[test]
fn undefined_canonical_bytes() {
    assert_eq!(encode_hex(Value::Undefined), "d40000");
}

/// 文本标签在 31/32 字节切换点两侧分别取 fixstr 与 str8。
#[test]
fn string_tag_switches_at_thirty_two_bytes() {
    let bytes31 = encode_hex(Value::Str("x".repeat(31)));
    assert!(bytes31.starts_with("bf"), "31 字节应为 fixstr：{bytes31}");

    let bytes32 = encode_hex(Value::Str("x".repeat(32)));
    assert!(bytes32.starts_with("d920"), "32 字节应为 str8：{bytes32}");
}

/// 空文本只写标签字节本身。
#[test]
fn empty_string_is_a_bare_tag() {
    assert_eq!(encode_hex(Value::Str(String::new())), "a0");
}

/// 二进制统一走 bin 族，空载荷也带长度字段。
#[test]
fn binary_tags_are_byte_exact() {
    assert_eq!(encode_hex(Value::from(Vec::<u8>::new())), "c400");
    assert_eq!(encode_hex(Value::from(vec![0xDEu8, 0xAD])), "c402dead");
}

/// 16 元素序列跨出 fixarray，走 array16 标签。
#[test]
fn sixteen_element_array_uses_array16() {
    let items: Vec<Value> = (0..16).map(Value::Integer).collect();
    let bytes = encode_hex(Value::Array(items));
    assert!(bytes.starts_with("dc0010"), "应为 array16 头：{bytes}");
}

/// 解码侧拒绝 0xDF：终局错误而非“数据未到齐”。
#[test]
fn decoder_rejects_the_map32_tag() {
    let s = Serializer::new();
    let err = s
        .decode_slice(&[0xDF, 0x00, 0x00, 0x00, 0x01, 0xA1, 0x61, 0x01])
        .expect_err("0xDF 应被拒绝");
    assert_eq!(err.code(), codes::OVERSIZED_MAP);
    assert!(!err.is_incomplete());
}

/// 编码侧拒绝条目数达到 2^16 的映射，不产生 0xDF。
#[test]
fn encoder_rejects_maps_with_sixty_four_ki_entries() {
    let entries: Vec<(Value, Value)> = (0..65_536)
        .map(|i| (Value::Integer(i), Value::Nil))
        .collect();
    let s = Serializer::new();
    let err = s.encode(&Value::Map(entries)).expect_err("超限映射应被拒绝");
    assert_eq!(err.code(), codes::OVERSIZED_MAP);
}

/// 保留标签 0xC1 解码为终局错误。
#[test]
fn reserved_tag_is_a_hard_error() {
    let s = Serializer::new();
    let err = s.decode_slice(&[0xC1]).expect_err("0xC1 应被拒绝");
    assert_eq!(err.code(), codes::RESERVED_TAG);
}

/// 非法 UTF-8 文本载荷是终局错误，不是“数据未到齐”。
#[test]
fn invalid_utf8_in_strings_is_fatal() {
    // fixstr(2) + 无效序列 0xFF 0xFE。
    let s = Serializer::new();
    let err = s.decode_slice(&[0xA2, 0xFF, 0xFE]).expect_err("坏 UTF-8 应被拒绝");
    assert_eq!(err.code(), codes::INVALID_UTF8);
}

/// float32 标签可解码（兼容读入），但编码侧从不产生它。
#[test]
fn float32_decodes_but_is_never_produced() {
    let s = Serializer::new();
    let value = s
        .decode_slice(&[0xCA, 0x3F, 0xC0, 0x00, 0x00])
        .expect("float32 应可解码");
    assert_eq!(value, Value::Float(1.5));
}
