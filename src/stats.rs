//! Statistical summaries over medicine record sets.
//!
//! Pure functions: no I/O, no side effects. `summarize` feeds both the
//! JSON insights surface and the PDF report renderer.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{MedicineFilter, MedicineRecord};

/// Bucket label for records missing a category, manufacturer or
/// classification.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of entries in the "top" rankings.
pub const TOP_N: usize = 5;

/// One `(label, count)` pair of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: u32,
}

/// Counts of records grouped by one categorical attribute.
///
/// Entries are kept in first-encountered order internally. Output
/// iteration (`sorted_entries`, serialization) is by count descending;
/// equal counts keep their first-encountered order. The sort is
/// stable and no secondary key is applied.
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    entries: Vec<DistributionEntry>,
    index: HashMap<String, usize>,
}

impl Distribution {
    /// Count one record under `label`; `None` and empty labels bucket
    /// under [`UNKNOWN_LABEL`].
    pub fn record(&mut self, label: Option<&str>) {
        let label = label.filter(|l| !l.is_empty()).unwrap_or(UNKNOWN_LABEL);
        match self.index.get(label) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(DistributionEntry {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn count_of(&self, label: &str) -> Option<u32> {
        self.index.get(label).map(|&i| self.entries[i].count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, equal to the number of records fed in.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Entries by count descending, ties in first-encountered order.
    pub fn sorted_entries(&self) -> Vec<DistributionEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// The `n` highest-count entries (fewer if fewer labels exist).
    pub fn top(&self, n: usize) -> Vec<DistributionEntry> {
        let mut sorted = self.sorted_entries();
        sorted.truncate(n);
        sorted
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted_entries();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for entry in &sorted {
            map.serialize_entry(&entry.label, &entry.count)?;
        }
        map.end()
    }
}

/// Statistical summary of a medicine record set.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_medicines: u32,
    pub filters_applied: MedicineFilter,
    pub generated_at: NaiveDateTime,
    pub category_distribution: Distribution,
    pub manufacturer_distribution: Distribution,
    pub classification_distribution: Distribution,
    pub top_5_categories: Vec<DistributionEntry>,
    pub top_5_manufacturers: Vec<DistributionEntry>,
}

/// Build the summary for a record set and the filters that produced it.
///
/// The filter set is carried through unmodified; `generated_at` is
/// stamped at call time and reused for the report filename.
pub fn summarize(records: &[MedicineRecord], filters: &MedicineFilter) -> ReportSummary {
    let mut categories = Distribution::default();
    let mut manufacturers = Distribution::default();
    let mut classifications = Distribution::default();

    for record in records {
        categories.record(record.category.as_deref());
        manufacturers.record(record.manufacturer.as_deref());
        classifications.record(record.classification.as_deref());
    }

    ReportSummary {
        total_medicines: records.len() as u32,
        filters_applied: filters.clone(),
        generated_at: chrono::Local::now().naive_local(),
        top_5_categories: categories.top(TOP_N),
        top_5_manufacturers: manufacturers.top(TOP_N),
        category_distribution: categories,
        manufacturer_distribution: manufacturers,
        classification_distribution: classifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        category: Option<&str>,
        manufacturer: Option<&str>,
        classification: Option<&str>,
    ) -> MedicineRecord {
        MedicineRecord {
            medicine_id: 0,
            name: name.into(),
            indication: None,
            dosage_form: None,
            strength: "10mg".into(),
            classification: classification.map(Into::into),
            manufacturer: manufacturer.map(Into::into),
            category: category.map(Into::into),
        }
    }

    #[test]
    fn fixed_record_set_round_trip() {
        let records = vec![
            record("A", Some("X"), Some("M1"), Some("Prescription")),
            record("B", Some("X"), Some("M2"), Some("OTC")),
        ];
        let summary = summarize(&records, &MedicineFilter::default());

        assert_eq!(summary.total_medicines, 2);
        assert_eq!(summary.category_distribution.count_of("X"), Some(2));
        assert_eq!(
            summary.classification_distribution.count_of("Prescription"),
            Some(1)
        );
        assert_eq!(summary.classification_distribution.count_of("OTC"), Some(1));
    }

    #[test]
    fn distribution_sums_equal_total() {
        let records = vec![
            record("A", Some("X"), None, Some("Prescription")),
            record("B", Some("Y"), Some("M1"), None),
            record("C", None, Some("M1"), Some("OTC")),
            record("D", Some("X"), Some("M2"), Some("OTC")),
        ];
        let summary = summarize(&records, &MedicineFilter::default());

        assert_eq!(summary.category_distribution.total(), 4);
        assert_eq!(summary.manufacturer_distribution.total(), 4);
        assert_eq!(summary.classification_distribution.total(), 4);
    }

    #[test]
    fn missing_values_bucket_under_unknown() {
        let records = vec![
            record("A", None, Some(""), None),
            record("B", Some("X"), None, None),
        ];
        let summary = summarize(&records, &MedicineFilter::default());

        assert_eq!(summary.category_distribution.count_of(UNKNOWN_LABEL), Some(1));
        assert_eq!(
            summary.manufacturer_distribution.count_of(UNKNOWN_LABEL),
            Some(2)
        );
        assert_eq!(
            summary.classification_distribution.count_of(UNKNOWN_LABEL),
            Some(2)
        );
    }

    #[test]
    fn top_is_bounded_sorted_subset() {
        let mut dist = Distribution::default();
        for (label, n) in [("a", 3), ("b", 7), ("c", 1), ("d", 5), ("e", 2), ("f", 4)] {
            for _ in 0..n {
                dist.record(Some(label));
            }
        }

        let top = dist.top(5);
        assert_eq!(top.len(), 5);
        let counts: Vec<u32> = top.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![7, 5, 4, 3, 2]);
        for entry in &top {
            assert_eq!(dist.count_of(&entry.label), Some(entry.count));
        }

        // Fewer labels than n
        let mut small = Distribution::default();
        small.record(Some("only"));
        assert_eq!(small.top(5).len(), 1);
    }

    #[test]
    fn equal_counts_keep_first_encountered_order() {
        let mut dist = Distribution::default();
        for label in ["zeta", "alpha", "mid", "mid"] {
            dist.record(Some(label));
        }

        let sorted = dist.sorted_entries();
        assert_eq!(sorted[0].label, "mid");
        // zeta was seen before alpha; both count 1, order preserved
        assert_eq!(sorted[1].label, "zeta");
        assert_eq!(sorted[2].label, "alpha");
    }

    #[test]
    fn empty_record_set_is_not_an_error() {
        let filter = MedicineFilter {
            classification: Some("Veterinary".into()),
            ..Default::default()
        };
        let summary = summarize(&[], &filter);

        assert_eq!(summary.total_medicines, 0);
        assert!(summary.category_distribution.is_empty());
        assert!(summary.top_5_categories.is_empty());
        assert_eq!(
            summary.filters_applied.classification.as_deref(),
            Some("Veterinary")
        );
    }

    #[test]
    fn distribution_serializes_as_map_in_descending_order() {
        let mut dist = Distribution::default();
        dist.record(Some("rare"));
        for _ in 0..3 {
            dist.record(Some("common"));
        }

        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"common":3,"rare":1}"#);
    }

    #[test]
    fn filters_carried_unmodified() {
        let filter = MedicineFilter {
            q: Some("aspirin".into()),
            ..Default::default()
        };
        let summary = summarize(&[], &filter);
        assert_eq!(summary.filters_applied.q.as_deref(), Some("aspirin"));
        assert!(summary.filters_applied.category.is_none());
    }
}
