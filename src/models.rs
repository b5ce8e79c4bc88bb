use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::PipelineError;

/// Student identifiers arrive as either bare integers or strings depending on
/// how the upstream roster was keyed; both compare and print the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One cohort row as returned by the prediction backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "StudentID")]
    pub student_id: StudentId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "AttendancePercentage")]
    pub attendance_percentage: f64,
    #[serde(rename = "AverageMarks")]
    pub average_marks: f64,
    /// 1 = high risk, 0 = not at risk.
    #[serde(rename = "RiskPrediction")]
    pub risk_prediction: i64,
    /// Raw model probability; present in the payload but not shown in table views.
    #[serde(rename = "RiskScore", default)]
    pub risk_score: Option<f64>,
}

impl StudentRecord {
    pub fn is_high_risk(&self) -> bool {
        self.risk_prediction == 1
    }

    pub fn risk_status(&self) -> &'static str {
        if self.is_high_risk() {
            "High Risk"
        } else {
            "Not At Risk"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    All,
    HighRisk,
    NotAtRisk,
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(RiskCategory::All),
            "high-risk" | "high" => Ok(RiskCategory::HighRisk),
            "not-at-risk" | "safe" => Ok(RiskCategory::NotAtRisk),
            other => Err(format!(
                "unknown risk category '{other}' (expected all, high-risk, or not-at-risk)"
            )),
        }
    }
}

/// Filter inputs as the dashboard holds them: a name search box, a department
/// dropdown with an "All" sentinel, and a risk dropdown.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub name_pattern: String,
    pub department: String,
    pub risk_category: RiskCategory,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            name_pattern: String::new(),
            department: "All".to_string(),
            risk_category: RiskCategory::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub total: usize,
    pub high_risk: usize,
    pub safe: usize,
}

/// SHAP explanation payload: parallel arrays keyed by position, as emitted by
/// the backend explainer.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapExplanation {
    pub base_value: f64,
    pub shap_values: Vec<f64>,
    pub feature_names: Vec<String>,
    pub feature_values: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentPoint {
    #[serde(rename = "TestName")]
    pub test_name: String,
    #[serde(rename = "MarksObtained")]
    pub marks_obtained: f64,
}

/// Per-student detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentDetail {
    pub main_data: StudentRecord,
    pub assessment_trend: Vec<AssessmentPoint>,
    pub shap_explanation: ShapExplanation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A finished export payload ready to hand to the save/download boundary.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub format: ExportFormat,
}
