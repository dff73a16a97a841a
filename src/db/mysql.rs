// Networked MySQL backend via the synchronous `mysql` driver.

use crate::dataset::{Dataset, Value};
use crate::{DbError, DbResult};
use mysql::prelude::Queryable;

pub fn append(conn: &mut mysql::Conn, table: &str, dataset: &Dataset) -> DbResult<usize> {
    conn.query_drop(create_table_sql(table, dataset))
        .map_err(|e| DbError::Write(format!("failed to create table '{}': {}", table, e)))?;

    if dataset.is_empty() {
        return Ok(0);
    }

    let sql = insert_sql(table, dataset);
    let params = dataset
        .rows()
        .iter()
        .map(|row| mysql::Params::Positional(row.iter().map(sql_value).collect()));
    conn.exec_batch(sql.as_str(), params)
        .map_err(|e| DbError::Write(format!("failed to insert into '{}': {}", table, e)))?;

    Ok(dataset.len())
}

pub fn read_table(conn: &mut mysql::Conn, table: &str) -> DbResult<Dataset> {
    let sql = format!("SELECT * FROM {}", quote(table));
    let mut result = conn
        .query_iter(sql.as_str())
        .map_err(|e| DbError::Query(format!("failed to query '{}': {}", table, e)))?;

    // Result-set metadata names the columns even when zero rows come back.
    let columns: Vec<String> = result
        .columns()
        .as_ref()
        .iter()
        .map(|c| c.name_str().into_owned())
        .collect();

    let mut dataset = Dataset::new(columns);
    for row in result.by_ref() {
        let row = row.map_err(|e| {
            DbError::Query(format!("failed to read row from '{}': {}", table, e))
        })?;
        // Row::unwrap moves out all column values; none were taken individually.
        dataset.push_row(row.unwrap().iter().map(from_sql).collect())?;
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
        "CREATE TABLE IF NOT EXISTS {} ({})",
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

fn column_type(dataset: &Dataset, idx: usize) -> &'static str {
    for row in dataset.rows() {
        match &row[idx] {
            Value::Integer(_) => return "BIGINT",
            Value::Real(_) => return "DOUBLE",
            Value::Text(_) => return "TEXT",
            Value::Null => continue,
        }
    }
    "TEXT"
}

fn quote(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

fn sql_value(value: &Value) -> mysql::Value {
    match value {
        Value::Null => mysql::Value::NULL,
        Value::Integer(i) => mysql::Value::Int(*i),
        Value::Real(r) => mysql::Value::Double(*r),
        Value::Text(s) => mysql::Value::Bytes(s.clone().into_bytes()),
    }
}

fn from_sql(value: &mysql::Value) -> Value {
    match value {
        mysql::Value::NULL => Value::Null,
        mysql::Value::Int(i) => Value::Integer(*i),
        mysql::Value::UInt(u) => Value::Integer(*u as i64),
        mysql::Value::Float(f) => Value::Real(*f as f64),
        mysql::Value::Double(d) => Value::Real(*d),
        mysql::Value::Bytes(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
        // Temporal values come back as their SQL literal, minus the quoting.
        other => Value::Text(other.as_sql(true).trim_matches('\'').to_string()),
    }
}
