//! Store schema
//!
//! The table layout produced by the DLD import. The query layer only reads
//! it; these helpers exist to build in-memory stores for synthetic data and
//! test fixtures.

use rusqlite::{params, Connection};

use super::Transaction;

/// Create the `transactions` table and its indexes
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            transaction_id TEXT PRIMARY KEY,
            instance_date TEXT NOT NULL,
            area_name_en TEXT,
            building_name_en TEXT,
            project_name_en TEXT,
            master_project_en TEXT,
            property_type_en TEXT,
            property_sub_type_en TEXT,
            property_usage_en TEXT,
            reg_type_en TEXT,
            trans_group_en TEXT,
            procedure_name_en TEXT,
            rooms_en TEXT,
            has_parking INTEGER,
            procedure_area REAL,
            actual_worth REAL,
            meter_sale_price REAL,
            nearest_metro_en TEXT,
            nearest_mall_en TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_transactions_area ON transactions(area_name_en);
        CREATE INDEX IF NOT EXISTS idx_transactions_building ON transactions(building_name_en);
        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(instance_date);
        "#,
    )
}

/// Insert one record, dates written as `YYYY-MM-DD`
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> rusqlite::Result<()> {
    conn.execute(
        r#"INSERT INTO transactions (
            transaction_id, instance_date, area_name_en, building_name_en,
            project_name_en, master_project_en, property_type_en, property_sub_type_en,
            property_usage_en, reg_type_en, trans_group_en, procedure_name_en,
            rooms_en, has_parking, procedure_area, actual_worth, meter_sale_price,
            nearest_metro_en, nearest_mall_en
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"#,
        params![
            tx.transaction_id,
            tx.instance_date.format("%Y-%m-%d").to_string(),
            tx.area_name,
            tx.building_name,
            tx.project_name,
            tx.master_project,
            tx.property_type,
            tx.property_sub_type,
            tx.property_usage,
            tx.reg_type,
            tx.trans_group,
            tx.procedure_name,
            tx.rooms,
            tx.has_parking as i64,
            tx.procedure_area,
            tx.actual_worth as f64,
            tx.meter_sale_price,
            tx.nearest_metro,
            tx.nearest_mall,
        ],
    )?;
    Ok(())
}
