//! Newsletter sections and their rendering order.
//!
//! Sections are grouped by `category`, then ordered by `order` within a
//! category. Two different sections that share both keys compare as equal,
//! so a stable sort keeps them in the order they were supplied.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A composable section of a newsletter.
///
/// Equality is structural: two values with identical fields are the same
/// logical section. Not `Ord`: [`compare`] reports `Equal` for distinct
/// sections that share a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSection {
    pub id: i32,
    #[serde(default, alias = "idNewsletter")]
    pub newsletter_id: i32,
    /// Key of the section-type implementation that renders this section.
    #[serde(default)]
    pub section_type_code: String,
    #[serde(default)]
    pub title: String,
    pub category: i32,
    pub order: i32,
}

impl NewsletterSection {
    /// Create a section at the given position.
    pub fn new(id: i32, category: i32, order: i32) -> Self {
        Self {
            id,
            category,
            order,
            ..Default::default()
        }
    }

    pub fn with_newsletter(mut self, newsletter_id: i32) -> Self {
        self.newsletter_id = newsletter_id;
        self
    }

    pub fn with_section_type(mut self, code: impl Into<String>) -> Self {
        self.section_type_code = code.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Compare two sections by category, then by order.
///
/// Sections with the same category and order compare as `Equal` even when
/// they are different sections. The tie is never broken by id.
pub fn compare(a: &NewsletterSection, b: &NewsletterSection) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    a.category
        .cmp(&b.category)
        .then_with(|| a.order.cmp(&b.order))
}

/// Sort sections for rendering.
///
/// Stable: sections tied on (category, order) keep their input order.
pub fn order_sections(mut sections: Vec<NewsletterSection>) -> Vec<NewsletterSection> {
    sections.sort_by(compare);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(sections: &[NewsletterSection]) -> Vec<i32> {
        sections.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_category_then_order() {
        let sections = vec![
            NewsletterSection::new(1, 2, 1),
            NewsletterSection::new(2, 1, 5),
            NewsletterSection::new(3, 1, 2),
        ];
        assert_eq!(ids(&order_sections(sections)), vec![3, 2, 1]);
    }

    #[test]
    fn test_same_section_is_equal() {
        let a = NewsletterSection::new(7, 3, 4).with_title("Events");
        assert_eq!(compare(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_tie_is_not_broken_by_id() {
        let a = NewsletterSection::new(10, 1, 1);
        let b = NewsletterSection::new(2, 1, 1);
        assert_ne!(a, b);
        assert_eq!(compare(&a, &b), Ordering::Equal);
        assert_eq!(compare(&b, &a), Ordering::Equal);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let sections = vec![
            NewsletterSection::new(9, 1, 1),
            NewsletterSection::new(4, 0, 3),
            NewsletterSection::new(1, 1, 1),
            NewsletterSection::new(5, 1, 1),
        ];
        assert_eq!(ids(&order_sections(sections)), vec![4, 9, 1, 5]);
    }

    #[test]
    fn test_negative_keys_sort_first() {
        let sections = vec![
            NewsletterSection::new(1, 0, 0),
            NewsletterSection::new(2, -1, 8),
            NewsletterSection::new(3, 0, -2),
        ];
        assert_eq!(ids(&order_sections(sections)), vec![2, 3, 1]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"id":4,"idNewsletter":2,"sectionTypeCode":"document","title":"News","category":1,"order":3}"#;
        let section: NewsletterSection = serde_json::from_str(json).unwrap();
        assert_eq!(section.newsletter_id, 2);
        assert_eq!(section.section_type_code, "document");
        assert_eq!((section.category, section.order), (1, 3));
    }

    fn section_strategy() -> impl Strategy<Value = NewsletterSection> {
        (0..50i32, -3..3i32, -3..3i32)
            .prop_map(|(id, category, order)| NewsletterSection::new(id, category, order))
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in section_strategy(), b in section_strategy()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_matches_category_then_order(a in section_strategy(), b in section_strategy()) {
            let expected = (a.category, a.order).cmp(&(b.category, b.order));
            prop_assert_eq!(compare(&a, &b), expected);
        }

        #[test]
        fn prop_order_sections_is_sorted_and_stable(
            sections in prop::collection::vec(section_strategy(), 0..20)
        ) {
            let sorted = order_sections(sections.clone());
            prop_assert_eq!(sorted.len(), sections.len());

            for pair in sorted.windows(2) {
                prop_assert!(compare(&pair[0], &pair[1]) != Ordering::Greater);
            }

            // Within each (category, order) group, input order survives.
            let mut expected = sections.clone();
            expected.sort_by_key(|s| (s.category, s.order));
            prop_assert_eq!(sorted, expected);
        }
    }
}
