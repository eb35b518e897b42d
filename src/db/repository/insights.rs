use rusqlite::{params, Connection, OptionalExtension};

use crate::db::repository::entity_counts;
use crate::db::DatabaseError;
use crate::models::{
    CategoryClassification, CategoryDetails, CategoryInfo, CategoryShare, InsightsOverview,
    ManufacturerDetails, ManufacturerInfo, ManufacturerRank, NamedCount,
};

const UNKNOWN: &str = "Unknown";

/// Medicine distribution across all categories, with percentage share.
pub fn category_distribution(conn: &Connection) -> Result<Vec<CategoryShare>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT
             c.name AS category,
             COUNT(m.medicine_id) AS count,
             ROUND(COUNT(m.medicine_id) * 100.0 / SUM(COUNT(m.medicine_id)) OVER (), 2)
         FROM category c
         LEFT JOIN medicine m ON c.category_id = m.category_id
         GROUP BY c.category_id, c.name
         ORDER BY count DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CategoryShare {
            category: row.get(0)?,
            count: row.get(1)?,
            percentage: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Category breakdown by classification.
pub fn category_classification(
    conn: &Connection,
) -> Result<Vec<CategoryClassification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.name, m.classification, COUNT(*)
         FROM medicine m
         JOIN category c ON m.category_id = c.category_id
         GROUP BY c.name, m.classification
         ORDER BY c.name, m.classification",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, u32>(2)?,
        ))
    })?;

    let mut breakdown: Vec<CategoryClassification> = Vec::new();
    for row in rows {
        let (category, classification, count) = row?;
        let slice = NamedCount {
            name: classification.unwrap_or_else(|| UNKNOWN.to_string()),
            count,
        };
        match breakdown.last_mut() {
            Some(entry) if entry.category == category => entry.classifications.push(slice),
            _ => breakdown.push(CategoryClassification {
                category,
                classifications: vec![slice],
            }),
        }
    }
    Ok(breakdown)
}

/// Detailed info for a specific category by name.
pub fn category_details(
    conn: &Connection,
    category_name: &str,
) -> Result<CategoryDetails, DatabaseError> {
    let info = conn
        .query_row(
            "SELECT
                 c.name,
                 c.description,
                 COUNT(m.medicine_id),
                 COUNT(DISTINCT m.manufacturer_id)
             FROM category c
             LEFT JOIN medicine m ON c.category_id = m.category_id
             WHERE c.name = ?1
             GROUP BY c.category_id, c.name, c.description",
            params![category_name],
            |row| {
                Ok(CategoryInfo {
                    category: row.get(0)?,
                    description: row.get(1)?,
                    medicine_count: row.get(2)?,
                    manufacturer_count: row.get(3)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DatabaseError::not_found("Category", category_name))?;

    let mut stmt = conn.prepare(
        "SELECT man.name, COUNT(*) AS count
         FROM medicine m
         JOIN manufacturer man ON m.manufacturer_id = man.manufacturer_id
         JOIN category c ON m.category_id = c.category_id
         WHERE c.name = ?1
         GROUP BY man.name
         ORDER BY count DESC
         LIMIT 5",
    )?;
    let rows = stmt.query_map(params![category_name], named_count_from_row)?;
    let top_manufacturers = rows.collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT m.dosage_form, COUNT(*) AS count
         FROM medicine m
         JOIN category c ON m.category_id = c.category_id
         WHERE c.name = ?1
         GROUP BY m.dosage_form
         ORDER BY count DESC",
    )?;
    let rows = stmt.query_map(params![category_name], optional_named_count_from_row)?;
    let dosage_forms = rows.collect::<Result<Vec<_>, _>>()?;

    Ok(CategoryDetails {
        category: info,
        top_manufacturers,
        dosage_forms,
    })
}

/// Top manufacturers ranked by medicine count, with market share.
pub fn manufacturer_ranking(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<ManufacturerRank>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT
             man.name AS manufacturer,
             COUNT(m.medicine_id) AS medicine_count,
             COUNT(DISTINCT m.category_id) AS category_count,
             ROUND(COUNT(m.medicine_id) * 100.0 / (SELECT COUNT(*) FROM medicine), 2)
         FROM manufacturer man
         LEFT JOIN medicine m ON man.manufacturer_id = m.manufacturer_id
         GROUP BY man.manufacturer_id, man.name
         ORDER BY medicine_count DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(ManufacturerRank {
            manufacturer: row.get(0)?,
            medicine_count: row.get(1)?,
            category_count: row.get(2)?,
            market_share: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Detailed info for a specific manufacturer by name.
pub fn manufacturer_details(
    conn: &Connection,
    manufacturer_name: &str,
) -> Result<ManufacturerDetails, DatabaseError> {
    let info = conn
        .query_row(
            "SELECT
                 man.name,
                 COUNT(m.medicine_id),
                 COUNT(DISTINCT m.category_id)
             FROM manufacturer man
             LEFT JOIN medicine m ON man.manufacturer_id = m.manufacturer_id
             WHERE man.name = ?1
             GROUP BY man.manufacturer_id, man.name",
            params![manufacturer_name],
            |row| {
                Ok(ManufacturerInfo {
                    manufacturer: row.get(0)?,
                    medicine_count: row.get(1)?,
                    category_count: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DatabaseError::not_found("Manufacturer", manufacturer_name))?;

    let mut stmt = conn.prepare(
        "SELECT c.name, COUNT(*) AS count
         FROM medicine m
         JOIN category c ON m.category_id = c.category_id
         JOIN manufacturer man ON m.manufacturer_id = man.manufacturer_id
         WHERE man.name = ?1
         GROUP BY c.name
         ORDER BY count DESC",
    )?;
    let rows = stmt.query_map(params![manufacturer_name], named_count_from_row)?;
    let categories = rows.collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT m.classification, COUNT(*) AS count
         FROM medicine m
         JOIN manufacturer man ON m.manufacturer_id = man.manufacturer_id
         WHERE man.name = ?1
         GROUP BY m.classification",
    )?;
    let rows = stmt.query_map(params![manufacturer_name], optional_named_count_from_row)?;
    let classifications = rows.collect::<Result<Vec<_>, _>>()?;

    Ok(ManufacturerDetails {
        manufacturer: info,
        categories,
        classifications,
    })
}

/// High-level dataset overview for the dashboard.
pub fn overview(conn: &Connection) -> Result<InsightsOverview, DatabaseError> {
    let (total_medicines, total_manufacturers, total_categories) = entity_counts(conn)?;

    let mut stmt = conn.prepare(
        "SELECT classification, COUNT(*) FROM medicine GROUP BY classification",
    )?;
    let rows = stmt.query_map([], optional_named_count_from_row)?;
    let classification_split = rows.collect::<Result<Vec<_>, _>>()?;

    let top_category = conn
        .query_row(
            "SELECT c.name, COUNT(*) AS count
             FROM medicine m
             JOIN category c ON m.category_id = c.category_id
             GROUP BY c.name
             ORDER BY count DESC
             LIMIT 1",
            [],
            named_count_from_row,
        )
        .optional()?;

    let top_manufacturer = conn
        .query_row(
            "SELECT man.name, COUNT(*) AS count
             FROM medicine m
             JOIN manufacturer man ON m.manufacturer_id = man.manufacturer_id
             GROUP BY man.name
             ORDER BY count DESC
             LIMIT 1",
            [],
            named_count_from_row,
        )
        .optional()?;

    Ok(InsightsOverview {
        total_medicines,
        total_manufacturers,
        total_categories,
        classification_split,
        top_category,
        top_manufacturer,
    })
}

fn named_count_from_row(row: &rusqlite::Row<'_>) -> Result<NamedCount, rusqlite::Error> {
    Ok(NamedCount {
        name: row.get(0)?,
        count: row.get(1)?,
    })
}

/// Same as `named_count_from_row`, but a NULL label buckets under "Unknown".
fn optional_named_count_from_row(row: &rusqlite::Row<'_>) -> Result<NamedCount, rusqlite::Error> {
    Ok(NamedCount {
        name: row
            .get::<_, Option<String>>(0)?
            .unwrap_or_else(|| UNKNOWN.to_string()),
        count: row.get(1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn setup_db() -> Connection {
        let conn = open_memory_database().expect("open_memory_database");
        conn.execute_batch(
            "INSERT INTO category (category_id, name, description) VALUES
                 (1, 'Analgesic', 'Pain relief'),
                 (2, 'Antibiotic', 'Bacterial infections'),
                 (3, 'Orphan', 'No medicines yet');
             INSERT INTO manufacturer (manufacturer_id, name) VALUES
                 (1, 'Acme Pharma'),
                 (2, 'Beta Labs');
             INSERT INTO medicine (medicine_id, name, strength, dosage_form, indication,
                                   classification, manufacturer_id, category_id) VALUES
                 (1, 'Aspirin', '500mg', 'Tablet', 'Pain', 'Over-the-Counter', 1, 1),
                 (2, 'Ibuprofen', '200mg', 'Tablet', 'Pain', 'Over-the-Counter', 1, 1),
                 (3, 'Naproxen', '250mg', 'Tablet', 'Pain', 'Prescription', 1, 1),
                 (4, 'Amoxicillin', '250mg', 'Capsule', 'Infection', 'Prescription', 2, 2);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn category_distribution_sorted_with_percentages() {
        let conn = setup_db();
        let dist = category_distribution(&conn).unwrap();
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].category, "Analgesic");
        assert_eq!(dist[0].count, 3);
        assert!((dist[0].percentage - 75.0).abs() < 0.01);
        assert_eq!(dist[2].category, "Orphan");
        assert_eq!(dist[2].count, 0);
    }

    #[test]
    fn category_classification_groups_per_category() {
        let conn = setup_db();
        let breakdown = category_classification(&conn).unwrap();
        assert_eq!(breakdown.len(), 2);

        let analgesic = &breakdown[0];
        assert_eq!(analgesic.category, "Analgesic");
        assert_eq!(
            analgesic.classifications,
            vec![
                NamedCount { name: "Over-the-Counter".into(), count: 2 },
                NamedCount { name: "Prescription".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn category_details_counts_and_rankings() {
        let conn = setup_db();
        let details = category_details(&conn, "Analgesic").unwrap();
        assert_eq!(details.category.medicine_count, 3);
        assert_eq!(details.category.manufacturer_count, 1);
        assert_eq!(details.top_manufacturers.len(), 1);
        assert_eq!(details.top_manufacturers[0].name, "Acme Pharma");
        assert_eq!(details.dosage_forms[0].name, "Tablet");
        assert_eq!(details.dosage_forms[0].count, 3);
    }

    #[test]
    fn category_details_empty_category_is_ok_but_unknown_is_not_found() {
        let conn = setup_db();
        // A category with zero medicines still resolves
        let details = category_details(&conn, "Orphan").unwrap();
        assert_eq!(details.category.medicine_count, 0);
        assert!(details.top_manufacturers.is_empty());

        // A name with no category row is a NotFound, not an empty success
        let err = category_details(&conn, "Nope").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn manufacturer_ranking_ordered_with_market_share() {
        let conn = setup_db();
        let ranking = manufacturer_ranking(&conn, 10).unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].manufacturer, "Acme Pharma");
        assert_eq!(ranking[0].medicine_count, 3);
        assert_eq!(ranking[0].category_count, 1);
        assert!((ranking[0].market_share - 75.0).abs() < 0.01);
    }

    #[test]
    fn manufacturer_ranking_respects_limit() {
        let conn = setup_db();
        let ranking = manufacturer_ranking(&conn, 1).unwrap();
        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn manufacturer_details_unknown_is_not_found() {
        let conn = setup_db();
        let details = manufacturer_details(&conn, "Acme Pharma").unwrap();
        assert_eq!(details.manufacturer.medicine_count, 3);
        assert_eq!(details.categories[0].name, "Analgesic");
        assert_eq!(details.classifications.len(), 2);

        let err = manufacturer_details(&conn, "Ghost Inc").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn overview_totals_and_top_entries() {
        let conn = setup_db();
        let view = overview(&conn).unwrap();
        assert_eq!(view.total_medicines, 4);
        assert_eq!(view.total_manufacturers, 2);
        assert_eq!(view.total_categories, 3);
        assert_eq!(view.top_category.as_ref().unwrap().name, "Analgesic");
        assert_eq!(view.top_manufacturer.as_ref().unwrap().name, "Acme Pharma");
        assert_eq!(view.classification_split.len(), 2);
    }

    #[test]
    fn overview_on_empty_database() {
        let conn = open_memory_database().unwrap();
        let view = overview(&conn).unwrap();
        assert_eq!(view.total_medicines, 0);
        assert!(view.top_category.is_none());
        assert!(view.top_manufacturer.is_none());
        assert!(view.classification_split.is_empty());
    }
}
