use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{
    Category, IngredientStrength, Manufacturer, MedicineDetail, MedicineFilter, MedicineRecord,
    MedicineUpdate, NewMedicine,
};

const RECORD_SELECT: &str = "SELECT
         m.medicine_id,
         m.name,
         m.indication,
         m.dosage_form,
         m.strength,
         m.classification,
         ma.name AS manufacturer,
         c.name AS category
     FROM medicine m
     LEFT JOIN manufacturer ma ON ma.manufacturer_id = m.manufacturer_id
     LEFT JOIN category c ON c.category_id = m.category_id";

/// Search medicines with the supplied filter set, ordered by name.
///
/// All filters combine with AND; an absent filter imposes no
/// constraint. `limit` of `None` returns every matching row (used by
/// the report export).
pub fn search_medicines(
    conn: &Connection,
    filter: &MedicineFilter,
    limit: Option<u32>,
) -> Result<Vec<MedicineRecord>, DatabaseError> {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(q) = filter.q.as_deref().filter(|v| !v.is_empty()) {
        clauses.push("(LOWER(m.name) LIKE LOWER(?) OR LOWER(m.indication) LIKE LOWER(?))");
        let pattern = format!("%{q}%");
        values.push(pattern.clone());
        values.push(pattern);
    }
    if let Some(category) = filter.category.as_deref().filter(|v| !v.is_empty()) {
        clauses.push("LOWER(c.name) LIKE LOWER(?)");
        values.push(format!("%{category}%"));
    }
    if let Some(manufacturer) = filter.manufacturer.as_deref().filter(|v| !v.is_empty()) {
        clauses.push("LOWER(ma.name) LIKE LOWER(?)");
        values.push(format!("%{manufacturer}%"));
    }
    if let Some(classification) = filter.classification.as_deref().filter(|v| !v.is_empty()) {
        clauses.push("m.classification = ?");
        values.push(classification.to_string());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let limit_sql = if limit.is_some() { " LIMIT ?" } else { "" };
    let sql = format!("{RECORD_SELECT}{where_sql} ORDER BY m.name ASC{limit_sql}");

    let limit_value = limit.map(i64::from);
    let mut bound: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    if let Some(ref l) = limit_value {
        bound.push(l);
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(&bound[..], record_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<MedicineRecord, rusqlite::Error> {
    Ok(MedicineRecord {
        medicine_id: row.get(0)?,
        name: row.get(1)?,
        indication: row.get(2)?,
        dosage_form: row.get(3)?,
        strength: row.get(4)?,
        classification: row.get(5)?,
        manufacturer: row.get(6)?,
        category: row.get(7)?,
    })
}

/// Full detail for one medicine, including its ingredient list.
pub fn get_medicine(conn: &Connection, medicine_id: i64) -> Result<MedicineDetail, DatabaseError> {
    let detail = conn
        .query_row(
            "SELECT
                 m.medicine_id, m.name, m.strength, m.dosage_form, m.indication,
                 m.classification, m.manufacturer_id, m.category_id,
                 ma.name AS manufacturer_name, c.name AS category_name
             FROM medicine m
             LEFT JOIN manufacturer ma ON ma.manufacturer_id = m.manufacturer_id
             LEFT JOIN category c ON c.category_id = m.category_id
             WHERE m.medicine_id = ?1",
            params![medicine_id],
            |row| {
                Ok(MedicineDetail {
                    medicine_id: row.get(0)?,
                    name: row.get(1)?,
                    strength: row.get(2)?,
                    dosage_form: row.get(3)?,
                    indication: row.get(4)?,
                    classification: row.get(5)?,
                    manufacturer_id: row.get(6)?,
                    category_id: row.get(7)?,
                    manufacturer_name: row.get(8)?,
                    category_name: row.get(9)?,
                    ingredients: Vec::new(),
                })
            },
        )
        .optional()?;

    let mut detail = detail.ok_or_else(|| DatabaseError::not_found("Medicine", medicine_id))?;

    let mut stmt = conn.prepare(
        "SELECT i.name, mi.strength
         FROM medicine_ingredient mi
         JOIN ingredient i ON i.ingredient_id = mi.ingredient_id
         WHERE mi.medicine_id = ?1
         ORDER BY i.name",
    )?;
    let rows = stmt.query_map(params![medicine_id], |row| {
        Ok(IngredientStrength {
            name: row.get(0)?,
            strength: row.get(1)?,
        })
    })?;
    detail.ingredients = rows.collect::<Result<Vec<_>, _>>()?;

    Ok(detail)
}

/// Distinct values available for each search filter.
pub fn list_manufacturers(conn: &Connection) -> Result<Vec<Manufacturer>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT manufacturer_id, name FROM manufacturer ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Manufacturer {
            manufacturer_id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT category_id, name, description FROM category ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            category_id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_dosage_forms(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT dosage_form FROM medicine
         WHERE dosage_form IS NOT NULL ORDER BY dosage_form",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_classifications(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT classification FROM medicine
         WHERE classification IS NOT NULL ORDER BY classification",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Insert a new medicine, returning its id.
pub fn create_medicine(conn: &mut Connection, med: &NewMedicine) -> Result<i64, DatabaseError> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO medicine (name, strength, category_id, manufacturer_id,
                               dosage_form, indication, classification)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            med.name,
            med.strength,
            med.category_id,
            med.manufacturer_id,
            med.dosage_form,
            med.indication,
            med.classification,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Apply a partial update. Fails with `NotFound` when the medicine
/// does not exist. The caller is expected to reject empty updates.
pub fn update_medicine(
    conn: &mut Connection,
    medicine_id: i64,
    update: &MedicineUpdate,
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;

    let exists: Option<i64> = tx
        .query_row(
            "SELECT medicine_id FROM medicine WHERE medicine_id = ?1",
            params![medicine_id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(DatabaseError::not_found("Medicine", medicine_id));
    }

    let mut sets: Vec<&'static str> = Vec::new();
    let mut bound: Vec<&dyn ToSql> = Vec::new();

    if let Some(ref name) = update.name {
        sets.push("name = ?");
        bound.push(name);
    }
    if let Some(ref strength) = update.strength {
        sets.push("strength = ?");
        bound.push(strength);
    }
    if let Some(ref category_id) = update.category_id {
        sets.push("category_id = ?");
        bound.push(category_id);
    }
    if let Some(ref manufacturer_id) = update.manufacturer_id {
        sets.push("manufacturer_id = ?");
        bound.push(manufacturer_id);
    }
    if let Some(ref dosage_form) = update.dosage_form {
        sets.push("dosage_form = ?");
        bound.push(dosage_form);
    }
    if let Some(ref indication) = update.indication {
        sets.push("indication = ?");
        bound.push(indication);
    }
    if let Some(ref classification) = update.classification {
        sets.push("classification = ?");
        bound.push(classification);
    }

    if sets.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields to update".into(),
        ));
    }

    let sql = format!(
        "UPDATE medicine SET {} WHERE medicine_id = ?",
        sets.join(", ")
    );
    bound.push(&medicine_id);
    tx.execute(&sql, &bound[..])?;
    tx.commit()?;
    Ok(())
}

/// Delete a medicine and its ingredient links in one transaction.
pub fn delete_medicine(conn: &mut Connection, medicine_id: i64) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;

    let exists: Option<i64> = tx
        .query_row(
            "SELECT medicine_id FROM medicine WHERE medicine_id = ?1",
            params![medicine_id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(DatabaseError::not_found("Medicine", medicine_id));
    }

    tx.execute(
        "DELETE FROM medicine_ingredient WHERE medicine_id = ?1",
        params![medicine_id],
    )?;
    tx.execute(
        "DELETE FROM medicine WHERE medicine_id = ?1",
        params![medicine_id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Row counts for the three primary tables (health check + overview).
pub fn entity_counts(conn: &Connection) -> Result<(u32, u32, u32), DatabaseError> {
    let medicines: u32 = conn.query_row("SELECT COUNT(*) FROM medicine", [], |r| r.get(0))?;
    let manufacturers: u32 =
        conn.query_row("SELECT COUNT(*) FROM manufacturer", [], |r| r.get(0))?;
    let categories: u32 = conn.query_row("SELECT COUNT(*) FROM category", [], |r| r.get(0))?;
    Ok((medicines, manufacturers, categories))
}
