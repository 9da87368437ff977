use burn::{
    backend::NdArray,
    tensor::{Distribution, Int, Tensor},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use textcnn_burn::models::textcnn::{Config, Mode};

type Backend = NdArray;

fn forward(c: &mut Criterion) {
    let device = Default::default();
    let config = Config::new(5_000).with_embedding_dim(50).with_seq_len(200);
    let model = config.init::<Backend>(&device).unwrap();

    let mut group = c.benchmark_group("textcnn_forward");
    group.sample_size(10);

    for batch_size in [1, 16] {
        let tokens = Tensor::<Backend, 2>::random(
            [batch_size, config.seq_len],
            Distribution::Uniform(0.0, config.vocab_size as f64),
            &device,
        )
        .int()
        .clamp(0, config.vocab_size as i32 - 1);

        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &tokens,
            |b, tokens: &Tensor<Backend, 2, Int>| {
                b.iter(|| {
                    model
                        .forward(black_box(tokens.clone()), Mode::Eval)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, forward);
criterion_main!(benches);
