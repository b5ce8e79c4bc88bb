use crate::models::{StudentRecord, SummaryStats};

/// Computes the summary-card counts from the currently displayed view, not the
/// unfiltered cohort. Recomputed on every filter change, never cached.
pub fn summarize(view: &[StudentRecord]) -> SummaryStats {
    let total = view.len();
    let high_risk = view.iter().filter(|r| r.is_high_risk()).count();

    SummaryStats {
        total,
        high_risk,
        safe: total - high_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentId;

    fn record(id: i64, risk: i64) -> StudentRecord {
        StudentRecord {
            student_id: StudentId::Number(id),
            name: format!("Student {id}"),
            department: "CS".to_string(),
            attendance_percentage: 80.0,
            average_marks: 70.0,
            risk_prediction: risk,
            risk_score: None,
        }
    }

    #[test]
    fn counts_split_by_prediction_flag() {
        let view = vec![record(1, 0), record(2, 1), record(3, 1)];
        let stats = summarize(&view);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high_risk, 2);
        assert_eq!(stats.safe, 1);
    }

    #[test]
    fn total_always_equals_high_risk_plus_safe() {
        for flags in [vec![], vec![0], vec![1], vec![0, 1, 0, 1, 1]] {
            let view: Vec<StudentRecord> = flags
                .iter()
                .enumerate()
                .map(|(i, &f)| record(i as i64, f))
                .collect();
            let stats = summarize(&view);
            assert_eq!(stats.total, stats.high_risk + stats.safe);
        }
    }

    #[test]
    fn empty_view_yields_zeroes() {
        let stats = summarize(&[]);
        assert_eq!(
            stats,
            SummaryStats {
                total: 0,
                high_risk: 0,
                safe: 0
            }
        );
    }
}
