use criterion::{criterion_group, criterion_main, Criterion};
use deepharmony_core::{get_tensor, FQDtype, Graph, Shape, TensorData, TensorSpec};

fn bench_get_tensor(c: &mut Criterion) {
    c.bench_function("get_tensor_1000_unnamed", |bencher| {
        bencher.iter(|| {
            let graph = Graph::new("bench");
            let _default = graph.as_default();
            for _ in 0..1000 {
                get_tensor(TensorSpec::new([64, 64]).dtype(FQDtype::FXP8)).unwrap();
            }
        });
    });
}

fn bench_get_tensor_with_data(c: &mut Criterion) {
    let shape = Shape::from([128, 128]);
    let data = TensorData::randn::<f32>(&shape);
    c.bench_function("get_tensor_128x128_with_data", |bencher| {
        let graph = Graph::new("bench");
        let _default = graph.as_default();
        bencher.iter(|| get_tensor(TensorSpec::new(shape.clone()).data(data.clone())).unwrap());
    });
}

criterion_group!(benches, bench_get_tensor, bench_get_tensor_with_data);
criterion_main!(benches);
