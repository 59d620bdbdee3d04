#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # vellum-codec-msgpack
//!
//! ## 教案目的（Why）
//! - **定位**：MessagePack 族的自描述紧凑线格式编解码核心，把标量、文本、
//!   二进制、有序序列、保持插入顺序的映射与应用注册的扩展类型转换为字节流并还原。
//! - **架构角色**：位于 `vellum-buffer` 游标缓冲之上，是整个序列化栈的语法层；
//!   日期、长整数、错误等具体扩展编解码器只是调用注册表 API 的外围胶水。
//! - **设计策略**：编码、解码均为无状态算法，以共享借用挂接同一份类型注册表；
//!   “数据未到齐”以双变体结果类型贯穿递归，绝不与合法空值混淆。
//!
//! ## 交互契约（What）
//! - [`Serializer`] 门面暴露三个入口：`encode`（值 → 字节）、`decode`
//!   （字节 → 值，数据不足时以 `codec.incomplete_buffer` 错误上报）与
//!   `try_decode`（把 [`DecodeOutcome`] 原样交给流式调用方）；
//! - [`TypeRegistry`] 维护扩展点：编码侧有序谓词列表首个命中者获胜，
//!   解码侧按类型号查表、同号后写覆盖；类型号限定 [0,127]；
//! - 标签表逐字节固定（见 [`tags`]），0xDF（4 字节长度映射）按策略拒绝。
//!
//! ## 实现策略（How）
//! - 解码是平坦标签文法上的递归下降解析：先以 [`tags::header_size`] 做
//!   粗粒度预检，再按族裁决载荷充足性，游标遵循“前进后失败”契约；
//! - 编码按值形态阶梯分发，整数采用量级最紧凑标签、越出 2^53 − 1 回退双精度；
//! - 扩展帧依载荷长度在定长（1/2/4/8/16）与变长（1/2/4 字节长度）标签间选择。
//!
//! ## 风险提示（Trade-offs）
//! - 递归深度等于结构嵌套深度，仅受调用栈约束，属于接受的资源上限；
//! - 门面在编解码期间对注册表只读，跨线程共享时注册必须先于首次使用完成；
//! - “数据未到齐”之后读游标不回滚，精确续传须以原始字节重建缓冲。

extern crate alloc;

pub mod common;
mod decode;
mod encode;
mod error;
mod registry;
mod serializer;
pub mod tags;
mod value;

pub use decode::{DecodeOutcome, Decoder};
pub use encode::{Encoder, MAX_SAFE_INTEGER};
pub use error::{CodecError, codes};
pub use registry::{DecoderEntry, EncoderEntry, ExtDecodeFn, ExtEncodeFn, ExtPredicate, TypeRegistry};
pub use serializer::{DEFAULT_INITIAL_CAPACITY, Serializer};
pub use value::{ExtValue, Value};

/// 便捷 re-export：游标缓冲类型，编解码入口的直接协作者。
pub use vellum_buffer::WireBuffer;
