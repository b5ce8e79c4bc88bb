use tracing::debug;

use crate::models::{FilterCriteria, RiskCategory, StudentRecord};

/// Applies the dashboard filters to a cohort and returns a fresh view.
///
/// All three criteria are ANDed. The source order is preserved and the input
/// is never mutated, so filtering an already-filtered view with the same
/// criteria is a no-op.
pub fn filter(cohort: &[StudentRecord], criteria: &FilterCriteria) -> Vec<StudentRecord> {
    let pattern = criteria.name_pattern.to_lowercase();

    let view: Vec<StudentRecord> = cohort
        .iter()
        .filter(|record| {
            matches_name(record, &pattern)
                && matches_department(record, &criteria.department)
                && matches_risk(record, criteria.risk_category)
        })
        .cloned()
        .collect();

    debug!(
        total = cohort.len(),
        matched = view.len(),
        "applied cohort filters"
    );
    view
}

fn matches_name(record: &StudentRecord, lowered_pattern: &str) -> bool {
    lowered_pattern.is_empty() || record.name.to_lowercase().contains(lowered_pattern)
}

fn matches_department(record: &StudentRecord, department: &str) -> bool {
    department == "All" || record.department == department
}

fn matches_risk(record: &StudentRecord, category: RiskCategory) -> bool {
    match category {
        RiskCategory::All => true,
        RiskCategory::HighRisk => record.risk_prediction == 1,
        RiskCategory::NotAtRisk => record.risk_prediction == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentId;

    fn sample_cohort() -> Vec<StudentRecord> {
        vec![
            StudentRecord {
                student_id: StudentId::Number(1),
                name: "Ann".to_string(),
                department: "CS".to_string(),
                attendance_percentage: 92.5,
                average_marks: 78.333,
                risk_prediction: 0,
                risk_score: None,
            },
            StudentRecord {
                student_id: StudentId::Number(2),
                name: "Ben".to_string(),
                department: "EE".to_string(),
                attendance_percentage: 55.0,
                average_marks: 40.0,
                risk_prediction: 1,
                risk_score: None,
            },
        ]
    }

    #[test]
    fn name_pattern_is_case_insensitive_substring() {
        let cohort = sample_cohort();
        let criteria = FilterCriteria {
            name_pattern: "an".to_string(),
            ..FilterCriteria::default()
        };

        let view = filter(&cohort, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Ann");
    }

    #[test]
    fn all_sentinel_matches_every_department() {
        let cohort = sample_cohort();
        let view = filter(&cohort, &FilterCriteria::default());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn department_match_is_exact() {
        let cohort = sample_cohort();
        let criteria = FilterCriteria {
            department: "EE".to_string(),
            ..FilterCriteria::default()
        };

        let view = filter(&cohort, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Ben");
    }

    #[test]
    fn risk_category_selects_by_prediction_flag() {
        let cohort = sample_cohort();
        let criteria = FilterCriteria {
            risk_category: RiskCategory::HighRisk,
            ..FilterCriteria::default()
        };

        let view = filter(&cohort, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Ben");

        let criteria = FilterCriteria {
            risk_category: RiskCategory::NotAtRisk,
            ..FilterCriteria::default()
        };
        let view = filter(&cohort, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Ann");
    }

    #[test]
    fn filtering_is_idempotent() {
        let cohort = sample_cohort();
        let criteria = FilterCriteria {
            name_pattern: "n".to_string(),
            department: "CS".to_string(),
            risk_category: RiskCategory::NotAtRisk,
        };

        let once = filter(&cohort, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.student_id, b.student_id);
        }
    }

    #[test]
    fn empty_cohort_yields_empty_view() {
        let view = filter(&[], &FilterCriteria::default());
        assert!(view.is_empty());
    }
}
