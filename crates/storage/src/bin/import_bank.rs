use std::path::{Path, PathBuf};

use clap::Parser;
use storage::import::{ImportError, ImportReport, extract_tests, file_key_for};

/// Convert exported HTML test pages into the JSON question bank.
#[derive(Debug, Parser)]
#[command(name = "import_bank", version)]
struct Args {
    /// Exported HTML pages to read, in order
    #[arg(long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Where to write the consolidated bank
    #[arg(long, env = "QUIZ_BANK", default_value = "data/questions.json")]
    output: PathBuf,
}

fn import_file(path: &Path) -> Result<ImportReport, ImportError> {
    let html = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(extract_tests(&html, file_key_for(&path.to_string_lossy())))
}

fn write_bank(path: &Path, report: &ImportReport) -> Result<u64, ImportError> {
    let write_err = |source| ImportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string(&report.tests)?;
    std::fs::write(path, json).map_err(write_err)?;
    Ok(std::fs::metadata(path).map(|m| m.len()).unwrap_or(0))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut all = ImportReport::default();
    for input in &args.inputs {
        let report = import_file(input)?;
        for test in &report.tests {
            println!(
                "OK: {} - {}q, {}min",
                test.name,
                test.questions.len(),
                test.duration_minutes()
            );
        }
        for skipped in &report.skipped {
            println!("FAIL: {} - {}", skipped.name, skipped.reason);
        }
        println!("{}: {} tests", input.display(), report.tests.len());
        all.merge(report);
    }

    println!();
    println!("Total: {} tests", all.tests.len());
    println!("Total questions: {}", all.question_total());

    let bytes = write_bank(&args.output, &all)?;
    #[allow(clippy::cast_precision_loss)]
    let megabytes = bytes as f64 / 1024.0 / 1024.0;
    println!("Saved: {} ({megabytes:.2} MB)", args.output.display());

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
