use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod explain;
mod export;
mod filter;
mod models;
mod snapshot;
mod summary;

use models::{
    ExportFormat, FilterCriteria, RiskCategory, StudentDetail, StudentId, StudentRecord,
};

#[derive(Parser)]
#[command(name = "risk-dashboard")]
#[command(about = "Analytics and reporting pipeline for student risk predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary counts and the filtered cohort table
    Summary {
        #[arg(long)]
        cohort: PathBuf,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "All")]
        department: String,
        #[arg(long, default_value = "all")]
        risk: String,
    },
    /// Export the filtered cohort as csv, xlsx, or pdf
    Export {
        #[arg(long)]
        cohort: PathBuf,
        #[arg(long)]
        format: String,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "All")]
        department: String,
        #[arg(long, default_value = "all")]
        risk: String,
    },
    /// Print a student profile with its risk explanation
    Explain {
        #[arg(long)]
        detail: PathBuf,
    },
    /// Compose a captured report image into a single-page PDF
    Snapshot {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            cohort,
            name,
            department,
            risk,
        } => {
            let records = load_cohort(&cohort)?;
            let criteria = build_criteria(name, department, &risk)?;
            let view = filter::filter(&records, &criteria);
            let stats = summary::summarize(&view);

            println!("Total students: {}", stats.total);
            println!("High risk: {}", stats.high_risk);
            println!("Safe: {}", stats.safe);

            if view.is_empty() {
                println!("No students match the current filters.");
                return Ok(());
            }

            println!();
            for record in &view {
                println!(
                    "- {} | {} | {} | attendance {:.2} | marks {:.2} | {}",
                    record.student_id,
                    record.name,
                    record.department,
                    record.attendance_percentage,
                    record.average_marks,
                    record.risk_status()
                );
            }
        }
        Commands::Export {
            cohort,
            format,
            out,
            name,
            department,
            risk,
        } => {
            let records = load_cohort(&cohort)?;
            let criteria = build_criteria(name, department, &risk)?;
            let view = filter::filter(&records, &criteria);
            let format: ExportFormat = format.parse()?;

            let artifact = export::export(&view, format)?;
            let out = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
            std::fs::write(&out, &artifact.bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "Export written to {} ({} bytes).",
                out.display(),
                artifact.bytes.len()
            );
        }
        Commands::Explain { detail } => {
            let detail = load_detail(&detail)?;
            let rendered = explain::render(&detail.shap_explanation)?;
            let student = &detail.main_data;

            println!(
                "{} ({}, ID {})",
                student.name, student.department, student.student_id
            );
            println!(
                "Attendance {:.2}% | Average marks {:.2} | Predicted risk: {}",
                student.attendance_percentage,
                student.average_marks,
                if student.is_high_risk() { "High" } else { "Low" }
            );

            println!();
            println!("Assessment trend:");
            if detail.assessment_trend.is_empty() {
                println!("No assessments recorded.");
            } else {
                for point in &detail.assessment_trend {
                    println!("- {}: {:.1}", point.test_name, point.marks_obtained);
                }
            }

            println!();
            println!(
                "AI predicts a final risk score of {:.2}",
                rendered.predicted_score
            );
            for row in &rendered.rows {
                println!(
                    "- {} = {} ({})",
                    row.name,
                    row.formatted_value,
                    row.direction.label()
                );
            }
        }
        Commands::Snapshot {
            image,
            student_id,
            out,
        } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("failed to read {}", image.display()))?;
            let captured = snapshot::capture(&bytes)?;
            let id = parse_student_id(student_id);

            let artifact = snapshot::compose(&captured, &id)?;
            let out = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
            std::fs::write(&out, &artifact.bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "Snapshot report written to {} ({} bytes).",
                out.display(),
                artifact.bytes.len()
            );
        }
    }

    Ok(())
}

fn build_criteria(
    name: String,
    department: String,
    risk: &str,
) -> anyhow::Result<FilterCriteria> {
    let risk_category: RiskCategory = risk.parse().map_err(anyhow::Error::msg)?;
    Ok(FilterCriteria {
        name_pattern: name,
        department,
        risk_category,
    })
}

fn parse_student_id(raw: String) -> StudentId {
    match raw.parse::<i64>() {
        Ok(n) => StudentId::Number(n),
        Err(_) => StudentId::Text(raw),
    }
}

/// Accepts either a bare record array or the backend's `{status, data}`
/// envelope.
fn load_cohort(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    #[derive(serde::Deserialize)]
    struct CohortEnvelope {
        data: Vec<StudentRecord>,
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read cohort file {}", path.display()))?;

    if let Ok(records) = serde_json::from_str::<Vec<StudentRecord>>(&raw) {
        return Ok(records);
    }

    let envelope: CohortEnvelope = serde_json::from_str(&raw)
        .context("cohort payload is neither a record array nor a data envelope")?;
    Ok(envelope.data)
}

fn load_detail(path: &Path) -> anyhow::Result<StudentDetail> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read detail file {}", path.display()))?;
    serde_json::from_str(&raw).context("malformed student detail payload")
}
