use crate::analyzers::types::{Category, CategoryCounts};
use crate::config::Vocabulary;

/// Classifies an exception label into at most one category with its weight.
///
/// | Label                        | Category      | Value      |
/// |------------------------------|---------------|------------|
/// | in the sick/personal set     | SickPersonal  | 1 or 0.5   |
/// | in the absence set           | Absent        | 1 or 0.5   |
/// | exactly the tardy label      | Tardy         | 1          |
/// | exactly the vacation label   | Vacation      | 1          |
/// | anything else, empty too     | none          | all zero   |
///
/// A listed label weighs 0.5 whenever it contains the half-day marker.
pub fn classify(label: &str, vocab: &Vocabulary) -> CategoryCounts {
    match category_of(label, vocab) {
        Some(category @ (Category::SickPersonal | Category::Absent)) => {
            CategoryCounts::only(category, day_weight(label, vocab))
        }
        Some(category) => CategoryCounts::only(category, 1.0),
        None => CategoryCounts::default(),
    }
}

/// The category a label belongs to. Sets are checked in a fixed order so a
/// label listed twice still lands in exactly one category.
pub fn category_of(label: &str, vocab: &Vocabulary) -> Option<Category> {
    if vocab.sick_personal_labels.iter().any(|l| l == label) {
        Some(Category::SickPersonal)
    } else if vocab.absent_labels.iter().any(|l| l == label) {
        Some(Category::Absent)
    } else if label == vocab.tardy_label {
        Some(Category::Tardy)
    } else if label == vocab.vacation_label {
        Some(Category::Vacation)
    } else {
        None
    }
}

/// 0.5 for a half-day label, 1 otherwise.
pub fn day_weight(label: &str, vocab: &Vocabulary) -> f64 {
    if vocab.is_half_day(label) { 0.5 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_and_half_day_leave() {
        let vocab = Vocabulary::default();
        assert_eq!(classify("sick-leave", &vocab).sick_personal_days, 1.0);
        assert_eq!(classify("personal-leave", &vocab).sick_personal_days, 1.0);
        assert_eq!(classify("sick-leave-half-day", &vocab).sick_personal_days, 0.5);
        assert_eq!(classify("personal-leave-half-day", &vocab).sick_personal_days, 0.5);
    }

    #[test]
    fn test_absence_weights() {
        let vocab = Vocabulary::default();
        let full = classify("absent", &vocab);
        let half = classify("absent-half-day", &vocab);
        assert_eq!(full.absent_days, 1.0);
        assert_eq!(half.absent_days, 0.5);
        assert_eq!(half.sick_personal_days, 0.0);
    }

    #[test]
    fn test_tardy_and_vacation_exact_match() {
        let vocab = Vocabulary::default();
        assert_eq!(classify("tardy", &vocab).tardy_count, 1.0);
        assert_eq!(classify("vacation", &vocab).vacation_count, 1.0);
        assert_eq!(classify("tardy-half-day", &vocab), CategoryCounts::default());
        assert_eq!(classify("Tardy", &vocab), CategoryCounts::default());
    }

    #[test]
    fn test_unknown_and_empty_labels_are_zero() {
        let vocab = Vocabulary::default();
        assert_eq!(classify("", &vocab), CategoryCounts::default());
        assert_eq!(classify("overtime", &vocab), CategoryCounts::default());
    }

    #[test]
    fn test_marker_weight_is_substring_based() {
        // A listed label weighs half as soon as it carries the marker.
        let mut vocab = Vocabulary::default();
        vocab.absent_labels.push("absent-half-day-morning".into());
        assert_eq!(classify("absent-half-day-morning", &vocab).absent_days, 0.5);
        assert_eq!(day_weight("anything-half-day", &vocab), 0.5);
    }

    #[test]
    fn test_label_listed_twice_lands_once() {
        let mut vocab = Vocabulary::default();
        vocab.absent_labels.push("sick-leave".into());
        let counts = classify("sick-leave", &vocab);
        assert_eq!(counts.nonzero_categories(), 1);
        assert_eq!(counts.sick_personal_days, 1.0);
    }

    #[test]
    fn test_thai_vocabulary() {
        let vocab = Vocabulary::thai();
        assert_eq!(classify("ลาป่วยครึ่งวัน", &vocab).sick_personal_days, 0.5);
        assert_eq!(classify("ขาด", &vocab).absent_days, 1.0);
        assert_eq!(classify("สาย", &vocab).tardy_count, 1.0);
        assert_eq!(classify("พักผ่อน", &vocab).vacation_count, 1.0);
    }
}
