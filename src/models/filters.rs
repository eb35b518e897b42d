use serde::{Deserialize, Serialize};

/// User-supplied search constraints, applied conjunctively.
///
/// Text filters (`q`, `category`, `manufacturer`) match as
/// case-insensitive substrings; `classification` matches exactly.
/// Absent fields impose no constraint. Every value is passed to the
/// database as a bound parameter, never spliced into SQL text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicineFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl MedicineFilter {
    pub fn is_empty(&self) -> bool {
        self.active_pairs().is_empty()
    }

    /// The active `(key, value)` pairs, skipping unset and blank values.
    pub fn active_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("q", self.q.as_deref()),
            ("category", self.category.as_deref()),
            ("manufacturer", self.manufacturer.as_deref()),
            ("classification", self.classification.as_deref()),
        ] {
            if let Some(v) = value {
                if !v.is_empty() {
                    pairs.push((key, v));
                }
            }
        }
        pairs
    }

    /// Human-readable `key: value` rendering for the report title block,
    /// `"None"` when no filter is active.
    pub fn describe(&self) -> String {
        let pairs = self.active_pairs();
        if pairs.is_empty() {
            return "None".to_string();
        }
        pairs
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
