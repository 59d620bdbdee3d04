use alloc::{string::String, sync::Arc, vec::Vec};
use core::any::Any;
use core::fmt::Debug;

use bytes::Bytes;

/// `ExtValue` 是值模型的开放扩展点：任意应用类型实现它即可搭载在线格式之上。
///
/// # 设计背景（Why）
/// - 内建形态以封闭枚举 [`Value`] 表达，运行时类型探测被谓词注册表取代；
///   扩展值因此需要一个对象安全的承载 trait，在不让核心认识具体类型的前提下
///   支持向下转型与相等性判定。
/// - 继承 `Any` 以获得安全的动态转型；继承 `Debug` 以保证诊断输出可用。
///
/// # 契约说明（What）
/// - `type_name`：用于“不支持的值”错误中点名肇事类型，建议返回稳定的短名；
/// - `ext_eq`：按值语义与另一扩展值比较，类型不同应返回 `false`；
/// - **前置条件**：实现必须满足 `Send + Sync + 'static`，与注册表的共享模型一致。
pub trait ExtValue: Any + Debug + Send + Sync {
    /// 返回该扩展值的运行时类型名。
    fn type_name(&self) -> &'static str;

    /// 与另一扩展值按值比较；类型不匹配时返回 `false`。
    fn ext_eq(&self, other: &dyn ExtValue) -> bool;
}

/// `Value` 是编解码核心的封闭值模型。
///
/// # 设计背景（Why）
/// - 把源生态的运行时类型分发重塑为显式和类型：每个内建形态对应一个变体，
///   编码器按变体直接分发，不再依赖动态类型探测；
/// - `Extension` 变体保留开放性：具体形态由注册表的有序谓词在编码期解析。
///
/// # 数据语义（What）
/// - `Nil` 与 `Undefined` 是两个不同的值：前者是显式空值（标签 0xC0），
///   后者是“无值”标记，编码为保留 id 0 的单零字节定长扩展；
/// - `Integer` 承载全部按整数标签编码的数值；`Float` 一律按双精度编码；
/// - `Map` 是保持插入顺序的键值对列表，键可以是任意 `Value`；
/// - `Extension` 以 `Arc` 持有扩展值，克隆代价为引用计数。
#[derive(Debug, Clone)]
pub enum Value {
    /// 显式空值。
    Nil,
    /// “无值”标记，与 `Nil` 可区分。
    Undefined,
    /// 布尔。
    Bool(bool),
    /// 有符号整数。
    Integer(i64),
    /// 双精度浮点。
    Float(f64),
    /// UTF-8 文本。
    Str(String),
    /// 原始二进制。
    Bin(Bytes),
    /// 有序序列。
    Array(Vec<Value>),
    /// 保持插入顺序的键值映射。
    Map(Vec<(Value, Value)>),
    /// 应用注册的扩展值。
    Extension(Arc<dyn ExtValue>),
}

impl Value {
    /// 以扩展值构造 `Value::Extension`。
    pub fn ext<T: ExtValue>(value: T) -> Self {
        Value::Extension(Arc::new(value))
    }

    /// 若当前为扩展值且具体类型为 `T`，返回其引用。
    pub fn downcast_ref<T: ExtValue>(&self) -> Option<&T> {
        match self {
            Value::Extension(ext) => (ext.as_ref() as &dyn Any).downcast_ref::<T>(),
            _ => None,
        }
    }

    /// 若当前为文本，返回其内容。
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 若当前为整数，返回其数值。
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// 若当前为浮点，返回其数值。
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bin(a), Value::Bin(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Extension(a), Value::Extension(b)) => a.ext_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bin(Bytes::from(v))
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bin(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(v: Vec<(Value, Value)>) -> Self {
        Value::Map(v)
    }
}
