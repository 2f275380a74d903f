use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ptrlogic::{count_stars, elaborate, Expr, Prop, Relation, Term};

/// A conjunction of `width` atoms, each dereferencing `depth` levels deep.
fn deep_prop(width: usize, depth: usize) -> Prop {
    let atom = |i: usize| {
        let mut term = Term::var(format!("p{}", i % 8));
        for _ in 0..depth {
            term = Term::deref(term);
        }
        Prop::atom(Relation::ExprEq(Expr::deref(term), Expr::constant(i as i64)))
    };
    (1..width).fold(atom(0), |acc, i| Prop::and(acc, atom(i)))
}

fn stars_benchmark(c: &mut Criterion) {
    let prop = deep_prop(64, 16);
    c.bench_function("count_stars deep conjunction", |b| {
        b.iter(|| count_stars(black_box(&prop)))
    });
}

fn elaborate_benchmark(c: &mut Criterion) {
    let prop = deep_prop(64, 16);
    c.bench_function("elaborate deep conjunction", |b| {
        b.iter(|| elaborate(black_box(&prop)))
    });
}

criterion_group!(benches, stars_benchmark, elaborate_benchmark);
criterion_main!(benches);
