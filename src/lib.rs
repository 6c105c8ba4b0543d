//! IPTV playlist aggregator.
//!
//! Fetches public playlist sources, normalizes and classifies the channels
//! into category buckets, merges curated entries and writes the full, lite
//! and custom playlist variants plus the sports-events page.

pub mod adapter;
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dictionary;
pub mod errors;
pub mod fetch;
pub mod html;
pub mod normalize;
pub mod output;
pub mod stats;

#[cfg(test)]
mod tests {
    use crate::classify::CATEGORIES;

    #[test]
    fn test_every_category_has_label_and_dictionary() {
        for category in CATEGORIES {
            assert!(!category.label.is_empty(), "{} has no label", category.id);
            assert!(
                category.dict_path.ends_with(".txt"),
                "{} has an odd dictionary path",
                category.id
            );
        }
    }
}
