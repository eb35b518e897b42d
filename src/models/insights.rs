use serde::Serialize;

/// A label with its medicine count. Shared row shape for the
/// GROUP BY queries behind the insights endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u32,
}

/// One category's share of all medicines.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u32,
    pub percentage: f64,
}

/// Per-category classification slices, ordered by classification name.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryClassification {
    pub category: String,
    pub classifications: Vec<NamedCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub category: String,
    pub description: Option<String>,
    pub medicine_count: u32,
    pub manufacturer_count: u32,
}

/// Detail payload for `GET /api/insights/categories/:name`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetails {
    pub category: CategoryInfo,
    pub top_manufacturers: Vec<NamedCount>,
    pub dosage_forms: Vec<NamedCount>,
}

/// One row of the manufacturer ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerRank {
    pub manufacturer: String,
    pub medicine_count: u32,
    pub category_count: u32,
    pub market_share: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerInfo {
    pub manufacturer: String,
    pub medicine_count: u32,
    pub category_count: u32,
}

/// Detail payload for `GET /api/insights/manufacturers/:name`.
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerDetails {
    pub manufacturer: ManufacturerInfo,
    pub categories: Vec<NamedCount>,
    pub classifications: Vec<NamedCount>,
}

/// High-level dataset overview for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsOverview {
    pub total_medicines: u32,
    pub total_manufacturers: u32,
    pub total_categories: u32,
    pub classification_split: Vec<NamedCount>,
    pub top_category: Option<NamedCount>,
    pub top_manufacturer: Option<NamedCount>,
}
