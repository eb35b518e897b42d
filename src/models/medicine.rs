use serde::{Deserialize, Serialize};

/// A medicine joined with its manufacturer and category names.
///
/// This is the shape the search endpoint returns and the shape the
/// aggregation and report modules consume. Manufacturer and category
/// stay `None` when the medicine has no reference; the sentinel
/// "Unknown" label is applied only during aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub medicine_id: i64,
    pub name: String,
    pub indication: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: String,
    pub classification: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
}

/// Full detail for a single medicine, including its ingredient list.
#[derive(Debug, Clone, Serialize)]
pub struct MedicineDetail {
    pub medicine_id: i64,
    pub name: String,
    pub strength: String,
    pub dosage_form: Option<String>,
    pub indication: Option<String>,
    pub classification: Option<String>,
    pub manufacturer_id: Option<i64>,
    pub category_id: Option<i64>,
    pub manufacturer_name: Option<String>,
    pub category_name: Option<String>,
    pub ingredients: Vec<IngredientStrength>,
}

/// One ingredient of a medicine with its per-medicine strength.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientStrength {
    pub name: String,
    pub strength: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manufacturer {
    pub manufacturer_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

fn default_classification() -> Option<String> {
    Some("Prescription".to_string())
}

/// Payload for creating a medicine.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    pub strength: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub manufacturer_id: Option<i64>,
    #[serde(default)]
    pub dosage_form: Option<String>,
    #[serde(default)]
    pub indication: Option<String>,
    #[serde(default = "default_classification")]
    pub classification: Option<String>,
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicineUpdate {
    pub name: Option<String>,
    pub strength: Option<String>,
    pub category_id: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub dosage_form: Option<String>,
    pub indication: Option<String>,
    pub classification: Option<String>,
}

impl MedicineUpdate {
    /// True when no field is set and there is nothing to update.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.strength.is_none()
            && self.category_id.is_none()
            && self.manufacturer_id.is_none()
            && self.dosage_form.is_none()
            && self.indication.is_none()
            && self.classification.is_none()
    }
}
