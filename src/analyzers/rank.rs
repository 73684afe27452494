use crate::analyzers::types::{Category, EmployeeDepartmentSummary, RankedRow};

/// Orders summary rows by one category's total, highest first.
///
/// The sort is stable: rows with equal totals keep their summary order.
/// Ranks are 1-based and assigned by position after sorting.
pub fn rank(summary: &[EmployeeDepartmentSummary], category: Category) -> Vec<RankedRow> {
    let mut rows: Vec<&EmployeeDepartmentSummary> = summary.iter().collect();
    rows.sort_by(|a, b| b.counts.get(category).total_cmp(&a.counts.get(category)));

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| RankedRow {
            rank: i + 1,
            employee_name: row.employee_name.clone(),
            department: row.department.clone(),
            value: row.counts.get(category),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::CategoryCounts;

    fn summary(name: &str, tardy: f64, absent: f64) -> EmployeeDepartmentSummary {
        EmployeeDepartmentSummary {
            employee_name: name.to_string(),
            department: "IT".to_string(),
            counts: CategoryCounts {
                tardy_count: tardy,
                absent_days: absent,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_rank_descending_with_positions() {
        let rows = vec![summary("A", 1.0, 0.0), summary("B", 3.0, 0.0), summary("C", 2.0, 0.0)];
        let ranked = rank(&rows, Category::Tardy);

        let order: Vec<_> = ranked.iter().map(|r| (r.rank, r.employee_name.as_str())).collect();
        assert_eq!(order, vec![(1, "B"), (2, "C"), (3, "A")]);
        assert_eq!(ranked[0].value, 3.0);
    }

    #[test]
    fn test_ties_keep_summary_order() {
        let rows = vec![
            summary("A", 0.0, 1.0),
            summary("B", 0.0, 2.0),
            summary("C", 0.0, 1.0),
            summary("D", 0.0, 2.0),
            summary("E", 0.0, 1.0),
        ];
        let ranked = rank(&rows, Category::Absent);
        let names: Vec<_> = ranked.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C", "E"]);
    }

    #[test]
    fn test_rank_empty_summary() {
        assert!(rank(&[], Category::Vacation).is_empty());
    }

    #[test]
    fn test_zero_rows_are_still_ranked() {
        let rows = vec![summary("A", 0.0, 0.0), summary("B", 1.0, 0.0)];
        let ranked = rank(&rows, Category::Tardy);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].employee_name, "A");
        assert_eq!(ranked[1].rank, 2);
    }
}
