#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! `vellum-buffer` 提供编解码核心消费的游标缓冲实现。
//!
//! # 模块定位（Why）
//! - 将“可增长字节容器 + 大端读写原语 + 读游标记账”从编解码算法中剥离，
//!   使 `vellum-codec-msgpack` 只关心标签语法与分发逻辑，不关心内存管理。
//! - 基于 `bytes::BytesMut` 落地，延续零拷贝生态的惯用类型，
//!   冻结后的只读视图可直接交给传输层复用。
//!
//! # 设计概要（How）
//! - [`WireBuffer`] 持有一块 `BytesMut` 与一个显式读偏移：
//!   写操作始终追加在尾部并按需扩容；读操作仅在剩余字节充足时消费并推进偏移。
//! - 读原语统一返回 `Option`：`None` 表示剩余字节不足，且保证读偏移原地不动，
//!   由上层解码器将其翻译为“数据未到齐”的流式信号。
//! - 不提供读偏移回退接口：流式调用方若需精确重试，应以原始字节重新包装缓冲，
//!   这是解码协议刻意保留的契约。
//!
//! # 契约说明（What）
//! - 所有多字节整数与浮点均为大端序；
//! - 写操作不可失败（内存耗尽视为进程级故障，不在本层建模）；
//! - 读偏移只进不退，且仅在成功读取后推进。

extern crate alloc;

mod wire_buffer;

pub use wire_buffer::WireBuffer;
