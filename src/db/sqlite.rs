// Embedded SQLite backend via rusqlite.

use crate::dataset::{Dataset, Value};
use crate::{DbError, DbResult};

pub fn append(
    conn: &mut rusqlite::Connection,
    table: &str,
    dataset: &Dataset,
) -> DbResult<usize> {
    conn.execute_batch(&create_table_sql(table, dataset))
        .map_err(|e| DbError::Write(format!("failed to create table '{}': {}", table, e)))?;

    if dataset.is_empty() {
        return Ok(0);
    }

    // One transaction for the whole dataset; the prepared statement is reused
    // across rows.
    let tx = conn
        .transaction()
        .map_err(|e| DbError::Write(e.to_string()))?;
    {
        let mut stmt = tx
            .prepare(&insert_sql(table, dataset))
            .map_err(|e| DbError::Write(e.to_string()))?;
        for row in dataset.rows() {
            stmt.execute(rusqlite::params_from_iter(row.iter().map(sql_value)))
                .map_err(|e| {
                    DbError::Write(format!("failed to insert into '{}': {}", table, e))
                })?;
        }
    }
    tx.commit().map_err(|e| DbError::Write(e.to_string()))?;

    Ok(dataset.len())
}

pub fn read_table(conn: &mut rusqlite::Connection, table: &str) -> DbResult<Dataset> {
    let sql = format!("SELECT * FROM {}", quote(table));
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| DbError::Query(format!("failed to query '{}': {}", table, e)))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut dataset = Dataset::new(columns.clone());
    let mut rows = stmt.query([]).map_err(|e| DbError::Query(e.to_string()))?;
    while let Some(row) = rows
        .next()
        .map_err(|e| DbError::Query(format!("failed to read row from '{}': {}", table, e)))?
    {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let cell = row
                .get_ref(idx)
                .map_err(|e| DbError::Query(e.to_string()))?;
            values.push(from_sql(cell));
        }
        dataset.push_row(values)?;
    }

    Ok(dataset)
}

fn create_table_sql(table: &str, dataset: &Dataset) -> String {
    let columns: Vec<String> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("{} {}", quote(name), column_type(dataset, idx)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        quote(table),
        columns.join(", ")
    )
}

fn insert_sql(table: &str, dataset: &Dataset) -> String {
    let columns: Vec<String> = dataset.columns().iter().map(|c| quote(c)).collect();
    let placeholders = vec!["?"; dataset.columns().len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

// Column affinity from the first non-null value; all-null columns fall back to TEXT.
fn column_type(dataset: &Dataset, idx: usize) -> &'static str {
    for row in dataset.rows() {
        match &row[idx] {
            Value::Integer(_) => return "INTEGER",
            Value::Real(_) => return "REAL",
            Value::Text(_) => return "TEXT",
            Value::Null => continue,
        }
    }
    "TEXT"
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(r) => rusqlite::types::Value::Real(*r),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
    }
}

fn from_sql(cell: rusqlite::types::ValueRef<'_>) -> Value {
    use rusqlite::types::ValueRef;
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let mut ds = Dataset::new(vec![
            "id".to_string(),
            "name".to_string(),
            "score".to_string(),
        ]);
        ds.push_row(vec![
            Value::Integer(1),
            Value::Text("Alice".to_string()),
            Value::Real(9.5),
        ])
        .unwrap();
        ds.push_row(vec![
            Value::Integer(2),
            Value::Text("Bob".to_string()),
            Value::Null,
        ])
        .unwrap();
        ds
    }

    #[test]
    fn test_create_table_sql_infers_types() {
        let ds = sample_dataset();
        assert_eq!(
            create_table_sql("people", &ds),
            "CREATE TABLE IF NOT EXISTS \"people\" (\"id\" INTEGER, \"name\" TEXT, \"score\" REAL);"
        );
    }

    #[test]
    fn test_all_null_column_defaults_to_text() {
        let mut ds = Dataset::new(vec!["blank".to_string()]);
        ds.push_row(vec![Value::Null]).unwrap();
        assert_eq!(column_type(&ds, 0), "TEXT");
    }

    #[test]
    fn test_quote_escapes_embedded_quotes() {
        assert_eq!(quote("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_append_preserves_values_and_nulls() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        let ds = sample_dataset();

        assert_eq!(append(&mut conn, "people", &ds).unwrap(), 2);

        let read = read_table(&mut conn, "people").unwrap();
        assert_eq!(read.columns(), ds.columns());
        assert_eq!(read.rows(), ds.rows());
    }

    #[test]
    fn test_append_twice_keeps_existing_rows() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        let ds = sample_dataset();

        append(&mut conn, "people", &ds).unwrap();
        append(&mut conn, "people", &ds).unwrap();

        let read = read_table(&mut conn, "people").unwrap();
        assert_eq!(read.len(), 4);
    }

    #[test]
    fn test_empty_dataset_creates_table_only() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        let ds = Dataset::new(vec!["id".to_string()]);

        assert_eq!(append(&mut conn, "empty", &ds).unwrap(), 0);

        let read = read_table(&mut conn, "empty").unwrap();
        assert_eq!(read.columns(), ["id"]);
        assert!(read.is_empty());
    }
}
