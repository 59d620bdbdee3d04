//! 编解码往返性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：在“无损定义域”上验证 `decode(encode(v)) == v` 恒成立，
//!   且报告的消费字节数恰等于编码长度。无损定义域指：整数限定在 2^53 − 1
//!   精确窗口内、浮点排除 NaN（自反相等不成立）、不含扩展值（其往返由
//!   各扩展自己的测试覆盖）。
//! - **设计手法 (Why)**：以 Proptest 的递归策略随机构造嵌套值树，深度与
//!   扇出受限以控制用例体积；对每个样本同时断言值恒等与消费量恒等，
//!   一次生成两条性质。
//!
//! # 合同与边界 (What)
//!
//! - **输入**：随机 `Value` 树，叶子含空值、无值标记、布尔、窗口内整数、
//!   有限浮点、文本与二进制；内部节点为序列与映射。
//! - **断言**：往返值与原值按结构相等；`consumed` 等于编码总长；
//!   任何真前缀解码均报告“数据未到齐”而非错误或错值。

use proptest::collection::vec as pvec;
use proptest::prelude::*;

use vellum_codec_msgpack::{
    DecodeOutcome, MAX_SAFE_INTEGER, Serializer, Value, WireBuffer,
};

/// 无损定义域内的叶子值策略。
fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).prop_map(Value::Integer),
        any::<f64>()
            .prop_filter("NaN 不满足自反相等", |f| !f.is_nan())
            .prop_map(Value::Float),
        ".{0,40}".prop_map(Value::from),
        pvec(any::<u8>(), 0..64).prop_map(Value::from),
    ]
}

/// 递归值树策略：叶子之上叠加序列与映射两类内部节点。
fn value_tree() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            pvec(inner.clone(), 0..6).prop_map(Value::Array),
            pvec((inner.clone(), inner), 0..6).prop_map(Value::Map),
        ]
    })
}

proptest! {
    /// 性质 1：无损定义域内编码—解码往返恒等，消费量等于编码长度。
    #[test]
    fn prop_roundtrip_is_identity(value in value_tree()) {
        let s = Serializer::new();
        let bytes = s.encode(&value).expect("无损定义域内编码不应失败");

        let mut buf = WireBuffer::from_slice(&bytes);
        match s.try_decode(&mut buf).expect("合法编码不应触发终局错误") {
            DecodeOutcome::Complete { value: back, consumed } => {
                prop_assert_eq!(&back, &value, "往返后值不一致");
                prop_assert_eq!(consumed, bytes.len(), "消费量应覆盖整个编码");
            }
            DecodeOutcome::Incomplete => {
                return Err(TestCaseError::fail("完整编码不应报告 Incomplete"));
            }
        }
    }

    /// 性质 2：任何真前缀解码都报告“数据未到齐”，绝不产出错值。
    #[test]
    fn prop_proper_prefixes_report_incomplete(value in value_tree(), cut_seed in any::<prop::sample::Index>()) {
        let s = Serializer::new();
        let bytes = s.encode(&value).expect("无损定义域内编码不应失败");
        prop_assume!(!bytes.is_empty());

        let cut = cut_seed.index(bytes.len());
        let mut buf = WireBuffer::from_slice(&bytes[..cut]);
        let outcome = s.try_decode(&mut buf).expect("截断合法编码不应触发终局错误");
        prop_assert!(outcome.is_incomplete(), "前 {} 字节就解码成功", cut);
    }

    /// 性质 3：同一值重复编码产生相同字节（编码为纯函数）。
    #[test]
    fn prop_encoding_is_deterministic(value in value_tree()) {
        let s = Serializer::new();
        let first = s.encode(&value).expect("编码不应失败");
        let second = s.encode(&value).expect("编码不应失败");
        prop_assert_eq!(first, second);
    }
}
