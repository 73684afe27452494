use crate::analyzers::types::{Category, EmployeeDepartmentSummary, ProportionRow};
use crate::analyzers::utility::round_to;

/// Share of each category in the combined total of `categories`.
///
/// Categories with a zero total are left out. Percentages are rounded to one
/// decimal. An empty result is returned when nothing was recorded.
pub fn proportions(
    summary: &[EmployeeDepartmentSummary],
    categories: &[Category],
) -> Vec<ProportionRow> {
    let totals: Vec<(Category, f64)> = categories
        .iter()
        .map(|&c| (c, summary.iter().map(|row| row.counts.get(c)).sum::<f64>()))
        .filter(|&(_, total)| total > 0.0)
        .collect();

    let overall: f64 = totals.iter().map(|&(_, total)| total).sum();
    if overall <= 0.0 {
        return Vec::new();
    }

    totals
        .into_iter()
        .map(|(category, total)| ProportionRow {
            category,
            total,
            percentage: round_to(100.0 * total / overall, 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::CategoryCounts;

    fn summary(counts: CategoryCounts) -> EmployeeDepartmentSummary {
        EmployeeDepartmentSummary {
            employee_name: "A".to_string(),
            department: "IT".to_string(),
            counts,
        }
    }

    #[test]
    fn test_proportions_skip_zero_categories() {
        let rows = vec![
            summary(CategoryCounts {
                tardy_count: 3.0,
                absent_days: 0.5,
                ..Default::default()
            }),
            summary(CategoryCounts {
                absent_days: 0.5,
                ..Default::default()
            }),
        ];
        let result = proportions(&rows, &Category::ALL);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, Category::Absent);
        assert_eq!(result[0].total, 1.0);
        assert_eq!(result[0].percentage, 25.0);
        assert_eq!(result[1].category, Category::Tardy);
        assert_eq!(result[1].percentage, 75.0);
    }

    #[test]
    fn test_proportions_round_to_one_decimal() {
        let rows = vec![summary(CategoryCounts {
            sick_personal_days: 1.0,
            absent_days: 1.0,
            tardy_count: 1.0,
            ..Default::default()
        })];
        let result = proportions(&rows, &Category::ALL);
        assert!(result.iter().all(|r| r.percentage == 33.3));
    }

    #[test]
    fn test_proportions_round_half_shares_to_even() {
        let rows = vec![summary(CategoryCounts {
            sick_personal_days: 1.0,
            absent_days: 1.0,
            tardy_count: 1.0,
            vacation_count: 13.0,
        })];
        let result = proportions(&rows, &Category::ALL);
        let shares: Vec<f64> = result.iter().map(|r| r.percentage).collect();
        assert_eq!(shares, vec![6.2, 6.2, 6.2, 81.2]);
    }

    #[test]
    fn test_proportions_empty_when_nothing_recorded() {
        assert!(proportions(&[], &Category::ALL).is_empty());
        let rows = vec![summary(CategoryCounts::default())];
        assert!(proportions(&rows, &Category::ALL).is_empty());
    }

    #[test]
    fn test_proportions_restricted_categories() {
        let rows = vec![summary(CategoryCounts {
            tardy_count: 1.0,
            vacation_count: 3.0,
            ..Default::default()
        })];
        let result = proportions(&rows, &[Category::Tardy]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].percentage, 100.0);
    }
}
