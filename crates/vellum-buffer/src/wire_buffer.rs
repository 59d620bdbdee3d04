use alloc::vec::Vec;

use bytes::{BufMut, Bytes, BytesMut};

/// `WireBuffer` 是编解码双方共用的游标字节缓冲。
///
/// # 设计动机（Why）
/// - 编码方需要一个“只追加”的可增长容器，解码方需要一个“只前进”的读游标，
///   两者共用同一块内存即可覆盖序列化的全部缓冲诉求；
/// - 原语层面统一大端序与 `Option` 式不足信号，使上层解码器的
///   “数据未到齐”判定不依赖异常或哨兵值。
///
/// # 结构设计（How）
/// - `data`：`BytesMut` 承载全部已写字节，写入始终发生在尾部；
/// - `roffset`：显式读偏移，读取成功后向前推进，失败时保持原位；
/// - 读与写互不干扰：读操作不会移除字节，调用方可随时通过
///   [`as_written`](Self::as_written) 观察完整的已写区间。
///
/// # 契约说明（What）
/// - **前置条件**：单次编码/解码调用独占缓冲，不存在并发读写；
/// - **后置条件**：任何返回 `None` 的读操作都未改变读偏移；
///   任何成功读操作恰好推进其读取的字节数。
///
/// # 风险提示（Trade-offs）
/// - 读偏移不可回退：流式调用方在收到“数据不足”后应以原始字节重建缓冲重试，
///   而不是复用已被部分消费的实例——这是上层解码协议的既定契约。
#[derive(Debug, Default, Clone)]
pub struct WireBuffer {
    data: BytesMut,
    roffset: usize,
}

impl WireBuffer {
    /// 创建空缓冲。
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定初始容量创建缓冲，容量不足时写入会自动扩容。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            roffset: 0,
        }
    }

    /// 以既有字节内容创建缓冲，读偏移从头开始。
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: BytesMut::from(slice),
            roffset: 0,
        }
    }

    /// 返回尚未被读取的字节数。
    pub fn remaining(&self) -> usize {
        self.data.len() - self.roffset
    }

    /// 返回当前读偏移（自缓冲起点计）。
    pub fn read_offset(&self) -> usize {
        self.roffset
    }

    /// 返回已写入的总字节数。
    pub fn written(&self) -> usize {
        self.data.len()
    }

    /// 观察完整的已写区间，不影响读偏移。
    pub fn as_written(&self) -> &[u8] {
        &self.data
    }

    /// 消耗缓冲并冻结为只读 `Bytes` 视图。
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    // ------------------------------------------------------------------
    // 写原语：追加在尾部，按需扩容，不可失败。
    // ------------------------------------------------------------------

    /// 追加单个字节。
    pub fn put_u8(&mut self, v: u8) {
        self.data.put_u8(v);
    }

    /// 追加大端 16 位无符号整数。
    pub fn put_u16(&mut self, v: u16) {
        self.data.put_u16(v);
    }

    /// 追加大端 32 位无符号整数。
    pub fn put_u32(&mut self, v: u32) {
        self.data.put_u32(v);
    }

    /// 追加大端 64 位无符号整数。
    pub fn put_u64(&mut self, v: u64) {
        self.data.put_u64(v);
    }

    /// 追加单个有符号字节。
    pub fn put_i8(&mut self, v: i8) {
        self.data.put_i8(v);
    }

    /// 追加大端 16 位有符号整数。
    pub fn put_i16(&mut self, v: i16) {
        self.data.put_i16(v);
    }

    /// 追加大端 32 位有符号整数。
    pub fn put_i32(&mut self, v: i32) {
        self.data.put_i32(v);
    }

    /// 追加大端 64 位有符号整数。
    pub fn put_i64(&mut self, v: i64) {
        self.data.put_i64(v);
    }

    /// 追加大端 IEEE 754 单精度浮点。
    pub fn put_f32(&mut self, v: f32) {
        self.data.put_f32(v);
    }

    /// 追加大端 IEEE 754 双精度浮点。
    pub fn put_f64(&mut self, v: f64) {
        self.data.put_f64(v);
    }

    /// 追加一段原始字节。
    pub fn put_slice(&mut self, slice: &[u8]) {
        self.data.put_slice(slice);
    }

    // ------------------------------------------------------------------
    // 读原语：剩余字节不足时返回 `None` 且读偏移保持原位。
    // ------------------------------------------------------------------

    /// 读取定长字节数组，内部支撑所有定宽读原语。
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.roffset..self.roffset + N]);
        self.roffset += N;
        Some(out)
    }

    /// 读取单个字节。
    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    /// 读取大端 16 位无符号整数。
    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    /// 读取大端 32 位无符号整数。
    pub fn read_u32(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// 读取大端 64 位无符号整数。
    pub fn read_u64(&mut self) -> Option<u64> {
        self.read_array::<8>().map(u64::from_be_bytes)
    }

    /// 读取单个有符号字节。
    pub fn read_i8(&mut self) -> Option<i8> {
        self.read_array::<1>().map(|b| b[0] as i8)
    }

    /// 读取大端 16 位有符号整数。
    pub fn read_i16(&mut self) -> Option<i16> {
        self.read_array::<2>().map(i16::from_be_bytes)
    }

    /// 读取大端 32 位有符号整数。
    pub fn read_i32(&mut self) -> Option<i32> {
        self.read_array::<4>().map(i32::from_be_bytes)
    }

    /// 读取大端 64 位有符号整数。
    pub fn read_i64(&mut self) -> Option<i64> {
        self.read_array::<8>().map(i64::from_be_bytes)
    }

    /// 读取大端 IEEE 754 单精度浮点。
    pub fn read_f32(&mut self) -> Option<f32> {
        self.read_array::<4>().map(f32::from_be_bytes)
    }

    /// 读取大端 IEEE 754 双精度浮点。
    pub fn read_f64(&mut self) -> Option<f64> {
        self.read_array::<8>().map(f64::from_be_bytes)
    }

    /// 读取 `len` 字节并以独立的 `Bytes` 返回。
    ///
    /// # 契约说明
    /// - **输入**：`len` 为期望消费的字节数，可为 0；
    /// - **前置条件**：无；剩余字节不足时返回 `None` 且读偏移不动；
    /// - **后置条件**：成功时读偏移恰好前进 `len`，返回值与源缓冲解耦，
    ///   后续写入不会影响已返回的切片。
    pub fn read_bytes(&mut self, len: usize) -> Option<Bytes> {
        if self.remaining() < len {
            return None;
        }
        let out = Bytes::copy_from_slice(&self.data[self.roffset..self.roffset + len]);
        self.roffset += len;
        Some(out)
    }

    /// 观察接下来的 `len` 字节而不推进读偏移。
    pub fn peek_slice(&self, len: usize) -> Option<&[u8]> {
        if self.remaining() < len {
            return None;
        }
        Some(&self.data[self.roffset..self.roffset + len])
    }
}

impl From<Vec<u8>> for WireBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: BytesMut::from(&data[..]),
            roffset: 0,
        }
    }
}

impl From<&[u8]> for WireBuffer {
    fn from(slice: &[u8]) -> Self {
        Self::from_slice(slice)
    }
}
