use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::ShapExplanation;

/// Contributions at or below this magnitude are presumed noise and hidden
/// from the rendered rows. They still count toward the predicted score.
pub const MATERIALITY_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    IncreasesRisk,
    DecreasesRisk,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::IncreasesRisk => "Increases Risk",
            Direction::DecreasesRisk => "Decreases Risk",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributionRow {
    pub name: String,
    pub formatted_value: String,
    pub direction: Direction,
    pub magnitude: f64,
}

#[derive(Debug, Clone)]
pub struct ExplanationView {
    pub predicted_score: f64,
    pub rows: Vec<AttributionRow>,
}

/// Turns a raw SHAP payload into the ranked, directional explanation shown to
/// mentors. The predicted score always sums every contribution, including the
/// ones the materiality threshold hides.
pub fn render(explanation: &ShapExplanation) -> Result<ExplanationView> {
    let names = explanation.feature_names.len();
    let values = explanation.feature_values.len();
    let shap = explanation.shap_values.len();
    if names != values || names != shap {
        return Err(PipelineError::MalformedExplanation {
            names,
            values,
            shap,
        });
    }

    let predicted_score =
        explanation.base_value + explanation.shap_values.iter().sum::<f64>();

    let mut paired: Vec<(&str, f64, f64)> = explanation
        .feature_names
        .iter()
        .zip(&explanation.feature_values)
        .zip(&explanation.shap_values)
        .map(|((name, &value), &shap)| (name.as_str(), value, shap))
        .collect();

    // Stable sort: ties keep the model's original feature order.
    paired.sort_by(|a, b| {
        b.2.abs()
            .partial_cmp(&a.2.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let rows: Vec<AttributionRow> = paired
        .into_iter()
        .filter(|(_, _, shap)| shap.abs() > MATERIALITY_THRESHOLD)
        .map(|(name, value, shap)| AttributionRow {
            name: name.replace('_', " "),
            formatted_value: format!("{value:.2}"),
            direction: if shap > 0.0 {
                Direction::IncreasesRisk
            } else {
                Direction::DecreasesRisk
            },
            magnitude: shap.abs(),
        })
        .collect();

    debug!(
        features = names,
        displayed = rows.len(),
        predicted_score,
        "rendered explanation"
    );

    Ok(ExplanationView {
        predicted_score,
        rows,
    })
}
