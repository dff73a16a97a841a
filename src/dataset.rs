// In-memory tabular dataset shared by the CSV parser, the loader and the reader.

use crate::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    // Schema inference for a raw cell: empty -> Null, integer literal -> Integer,
    // float literal -> Real, anything else -> Text.
    pub fn parse(raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Real(f);
        }
        Value::Text(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

// Ordered rows over a fixed, named column set. No uniqueness or relational
// invariant is enforced here; that is the destination schema's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> DbResult<()> {
        if row.len() != self.columns.len() {
            return Err(DbError::InvalidOperation(format!(
                "row has {} values but dataset has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    // JSON projection: an array of row objects keyed by column name.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    serde_json::Value::Object(
                        self.columns
                            .iter()
                            .cloned()
                            .zip(row.iter().map(json_value))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(r) => serde_json::Number::from_f64(*r)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::from(s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parse_inference() {
        assert_eq!(Value::parse(""), Value::Null);
        assert_eq!(Value::parse("42"), Value::Integer(42));
        assert_eq!(Value::parse("-7"), Value::Integer(-7));
        assert_eq!(Value::parse("3.5"), Value::Real(3.5));
        assert_eq!(Value::parse("Alice"), Value::Text("Alice".to_string()));
        // Mixed digits and letters stay text
        assert_eq!(Value::parse("42nd"), Value::Text("42nd".to_string()));
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut ds = Dataset::new(vec!["a".to_string(), "b".to_string()]);
        assert!(ds.push_row(vec![Value::Integer(1), Value::Integer(2)]).is_ok());

        let err = ds.push_row(vec![Value::Integer(1)]).unwrap_err();
        assert!(matches!(err, crate::DbError::InvalidOperation(_)));
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_column_index() {
        let ds = Dataset::new(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(ds.column_index("name"), Some(1));
        assert_eq!(ds.column_index("missing"), None);
    }

    #[test]
    fn test_to_json_rows_keyed_by_column() {
        let mut ds = Dataset::new(vec!["id".to_string(), "name".to_string()]);
        ds.push_row(vec![Value::Integer(1), Value::Text("Alice".to_string())])
            .unwrap();
        ds.push_row(vec![Value::Integer(2), Value::Null]).unwrap();

        let json = ds.to_json();
        assert_eq!(json[0]["id"], serde_json::json!(1));
        assert_eq!(json[0]["name"], serde_json::json!("Alice"));
        assert_eq!(json[1]["name"], serde_json::Value::Null);
    }
}
