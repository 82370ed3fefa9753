use criterion::{black_box, criterion_group, criterion_main, Criterion};

use biascheck_core::batch::{analyze_exam, remediation_plan, GradeFloor};
use biascheck_core::model::{AnswerOption, AnswerRecord, ExamBank, Question, QuestionType};
use biascheck_core::{analyze_answers, Thresholds};

fn balanced_answers() -> Vec<AnswerRecord> {
    vec![
        AnswerRecord::correct("Use Amazon S3 for object storage"),
        AnswerRecord::distractor("Use Amazon EBS for block storage")
            .with_reason("EBS volumes attach to a single instance"),
        AnswerRecord::distractor("Use Amazon EFS for file storage")
            .with_reason("EFS is a shared POSIX file system"),
        AnswerRecord::distractor("Use Amazon FSx for Windows files")
            .with_reason("FSx targets Windows file shares"),
    ]
}

fn lopsided_answers() -> Vec<AnswerRecord> {
    vec![
        AnswerRecord::correct("A".repeat(180)),
        AnswerRecord::distractor("B".repeat(20)).with_reason("x"),
        AnswerRecord::distractor("C".repeat(20)),
        AnswerRecord::distractor("D".repeat(20)),
    ]
}

fn make_exam(n: usize) -> ExamBank {
    let questions = (0..n)
        .map(|i| {
            let records = if i % 3 == 0 {
                lopsided_answers()
            } else {
                balanced_answers()
            };
            Question {
                id: format!("q{i}"),
                text: format!("Benchmark question {i}"),
                question_type: QuestionType::Single,
                choose_n: None,
                answers: records
                    .into_iter()
                    .enumerate()
                    .map(|(j, record)| AnswerOption {
                        id: format!("q{i}-{}", j + 1),
                        record,
                    })
                    .collect(),
            }
        })
        .collect();

    ExamBank {
        id: "bench".into(),
        name: "Benchmark".into(),
        description: String::new(),
        questions,
    }
}

fn bench_analyze_answers(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_answers");
    let thresholds = Thresholds::default();

    group.bench_function("balanced", |b| {
        let answers = balanced_answers();
        b.iter(|| analyze_answers(black_box(&answers), black_box(&thresholds)))
    });

    group.bench_function("lopsided", |b| {
        let answers = lopsided_answers();
        b.iter(|| analyze_answers(black_box(&answers), black_box(&thresholds)))
    });

    group.bench_function("empty", |b| {
        let answers: Vec<AnswerRecord> = Vec::new();
        b.iter(|| analyze_answers(black_box(&answers), black_box(&thresholds)))
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let thresholds = Thresholds::default();
    let small = make_exam(20);
    let large = make_exam(500);

    group.bench_function("exam_20", |b| {
        b.iter(|| analyze_exam(black_box(&small), black_box(&thresholds), false))
    });

    group.bench_function("exam_500_breakdown", |b| {
        b.iter(|| analyze_exam(black_box(&large), black_box(&thresholds), true))
    });

    group.bench_function("remediation_500", |b| {
        b.iter(|| {
            remediation_plan(
                black_box(&large),
                black_box(&thresholds),
                GradeFloor::D,
                100,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_analyze_answers, bench_batch);
criterion_main!(benches);
