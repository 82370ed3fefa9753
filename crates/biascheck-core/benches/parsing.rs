use criterion::{black_box, criterion_group, criterion_main, Criterion};

use biascheck_core::parser::{parse_exam_bank_str, validate_exam_bank};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_bank_toml(5);
    let medium_toml = generate_bank_toml(50);
    let large_toml = generate_bank_toml(200);

    group.bench_function("5_questions", |b| {
        b.iter(|| parse_exam_bank_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| parse_exam_bank_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| parse_exam_bank_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let bank = match parse_exam_bank_str(&generate_bank_toml(200), "bench.toml".as_ref()) {
        Ok(bank) => bank,
        Err(e) => panic!("bench bank must parse: {e:#}"),
    };

    c.bench_function("validate_200_questions", |b| {
        b.iter(|| validate_exam_bank(black_box(&bank)))
    });
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[exam]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "q{i}"
text = "Which storage option fits workload {i}?"
type = "single"

[[questions.answers]]
text = "Use Amazon S3 for object storage"
correct = true

[[questions.answers]]
text = "Use Amazon EBS for block storage"
distractor_reason = "EBS volumes attach to a single instance"

[[questions.answers]]
text = "Use Amazon EFS for file storage"
distractor_reason = "EFS is a shared POSIX file system"

[[questions.answers]]
text = "Use Amazon FSx for Windows files"
distractor_reason = "FSx targets Windows file shares"
"#
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_validation);
criterion_main!(benches);
