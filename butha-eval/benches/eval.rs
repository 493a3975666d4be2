use butha_eval::Evaluator;
use butha_parser::{parse_str, Node};
use butha_passes::optimize;
use butha_value::{Scope, Value};
use criterion::{criterion_group, criterion_main, Criterion};

fn run(ast: &Node) -> Value {
    Evaluator::new().evaluate(ast, &Scope::new()).unwrap()
}

fn fib(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib");

    let source = "
        function fib(n) if n - 1 then if n then fib(n - 1) + fib(n - 2) else 0 else 1
        fib(15)
    ";
    let ast = parse_str(source).unwrap();
    group.bench_function("fib", |b| b.iter(|| run(&ast)));
}

fn arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");

    let mut source = "1".to_string();
    for _i in 0..500 {
        source.push_str(" + 2 * 3 - 4 / 5");
    }
    let ast = parse_str(&source).unwrap();
    let optimized = optimize(&ast);
    group.bench_function("unoptimized", |b| b.iter(|| run(&ast)));
    group.bench_function("optimized", |b| b.iter(|| run(&optimized)));
}

criterion_group!(benches, fib, arithmetic);
criterion_main!(benches);
