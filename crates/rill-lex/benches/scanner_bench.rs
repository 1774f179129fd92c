//! Scanner throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rill_lex::{Scanner, TokenKind};

fn sample_source() -> String {
    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "let value{i} = {i} * 2 + 1;\n\
             if (value{i} > 100) {{ print value{i}; }} else {{ print \"small\"; }}\n\
             // running total\n\
             let label{i} = \"item \" + \"number\";\n"
        ));
    }
    source
}

fn scan_to_eof(source: &str) -> usize {
    let mut scanner = Scanner::new(source);
    let mut count = 0;
    loop {
        let token = scanner.scan_token();
        count += 1;
        if token.kind == TokenKind::Eof {
            return count;
        }
    }
}

fn bench_scanner(c: &mut Criterion) {
    let source = sample_source();
    c.bench_function("scan_mixed_source", |b| {
        b.iter(|| scan_to_eof(black_box(&source)))
    });
}

criterion_group!(benches, bench_scanner);
criterion_main!(benches);
