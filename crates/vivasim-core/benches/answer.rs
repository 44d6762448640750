use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vivasim_core::answer::{check_answer, word_weights};
use vivasim_core::person::Person;

fn bench_word_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_weights");

    for n in [1usize, 5, 20] {
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| word_weights(black_box(n)))
        });
    }

    group.finish();
}

fn bench_check_answer(c: &mut Criterion) {
    let examiner = Person::new("Игорь", "Петров").unwrap();
    let student = Person::new("Анна", "Иванова").unwrap();
    let question = "объясните разницу между потоком процессом и сопрограммой в асинхронном коде";

    let mut group = c.benchmark_group("check_answer");

    group.bench_function("ten_words", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| {
            check_answer(
                black_box(&examiner),
                black_box(&student),
                black_box(question),
                &mut rng,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_word_weights, bench_check_answer);
criterion_main!(benches);
