use criterion::{Criterion, criterion_group, criterion_main};

use vellum_codec_msgpack::common::{ExtDate, register_common_types};
use vellum_codec_msgpack::{Serializer, Value, WireBuffer};

/// 构造贴近业务报文形态的嵌套样本：映射 + 序列 + 标量 + 扩展日期。
fn sample_value() -> Value {
    let records: Vec<Value> = (0..32)
        .map(|i| {
            Value::Map(vec![
                (Value::from("id"), Value::Integer(i)),
                (Value::from("name"), Value::Str(format!("record-{i}"))),
                (Value::from("score"), Value::Float(i as f64 * 0.25)),
                (Value::from("payload"), Value::from(vec![0u8; 24])),
                (Value::from("seen"), Value::ext(ExtDate::from_millis(1_700_000_000_000 + i as u64))),
            ])
        })
        .collect();
    Value::Map(vec![
        (Value::from("records"), Value::Array(records)),
        (Value::from("total"), Value::Integer(32)),
        (Value::from("cursor"), Value::Nil),
    ])
}

/// `bench_encode` 度量嵌套值的编码吞吐。
///
/// # 设计目的（Why）
/// - 编码是热路径，样本覆盖整数阶梯、文本、二进制与扩展帧四类分发；
/// - 每轮复用门面但重建缓冲，度量的是单帧编码成本而非缓冲分配策略。
fn bench_encode(c: &mut Criterion) {
    let mut s = Serializer::new();
    register_common_types(&mut s).expect("约定类型应可注册");
    let value = sample_value();

    c.bench_function("encode_nested_map", |b| {
        b.iter(|| s.encode(std::hint::black_box(&value)).expect("编码应成功"));
    });
}

/// `bench_decode` 度量同一样本的解码吞吐，每轮从原始字节重建缓冲。
fn bench_decode(c: &mut Criterion) {
    let mut s = Serializer::new();
    register_common_types(&mut s).expect("约定类型应可注册");
    let bytes = s.encode(&sample_value()).expect("编码应成功");

    c.bench_function("decode_nested_map", |b| {
        b.iter(|| {
            let mut buf = WireBuffer::from_slice(std::hint::black_box(&bytes));
            s.decode(&mut buf).expect("解码应成功")
        });
    });
}

criterion_group!(codec_benches, bench_encode, bench_decode);
criterion_main!(codec_benches);
