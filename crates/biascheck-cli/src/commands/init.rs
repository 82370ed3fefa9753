//! The `biascheck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create biascheck.toml
    if std::path::Path::new("biascheck.toml").exists() {
        println!("biascheck.toml already exists, skipping.");
    } else {
        std::fs::write("biascheck.toml", SAMPLE_CONFIG)?;
        println!("Created biascheck.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Tune the thresholds in biascheck.toml");
    println!("  2. Run: biascheck validate --bank banks/example.toml");
    println!("  3. Run: biascheck exam --bank banks/example.toml --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# biascheck configuration

output_dir = "./biascheck-results"
default_min_grade = "D"
default_limit = 20

[thresholds]
max_length_variance_percent = 50.0
min_correct_distractor_ratio = 0.7
max_correct_distractor_ratio = 1.3
min_answer_length = 10
require_distractor_reason = false
min_distractor_reason_length = 20
"#;

const EXAMPLE_BANK: &str = r#"[exam]
id = "example"
name = "Example Exam"
description = "A small example question bank to get started"

[[questions]]
id = "storage-objects"
text = "Which AWS service is designed for durable object storage?"
type = "single"

[[questions.answers]]
text = "Use Amazon S3 for object storage"
correct = true

[[questions.answers]]
text = "Use Amazon EBS for block storage"
distractor_reason = "EBS is durable, but volumes attach to one instance"

[[questions.answers]]
text = "Use Amazon EFS for file storage"
distractor_reason = "EFS is shared storage, but it is a file system"

[[questions.answers]]
text = "Use Amazon FSx for Windows files"
distractor_reason = "FSx stores files for Windows workloads, not objects"

[[questions]]
id = "s3-protection"
text = "Which two settings protect S3 objects from accidental deletion?"
type = "choose_n"
choose_n = 2

[[questions.answers]]
text = "Enable versioning on the bucket so that every overwrite and delete keeps the previous object version recoverable"
correct = true

[[questions.answers]]
text = "Enable MFA delete so that permanently removing a version requires a second authentication factor"
correct = true

[[questions.answers]]
text = "Enable transfer acceleration"

[[questions.answers]]
text = "Enable static hosting"
"#;
