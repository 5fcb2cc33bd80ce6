use std::fmt;

/// A single cell value read from a record by column key.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Empty,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            // Whole amounts print without a fractional part: 1999, not 1999.0.
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Number(value as f64))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Empty)
    }
}

/// Uniform field access used for searching, sorting and export.
pub trait Record {
    fn id(&self) -> &str;

    /// Value for a column key, or `None` when the record has no such field.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// String form of a field; unknown keys read as empty text.
    fn field_text(&self, key: &str) -> String {
        self.field(key).map(|v| v.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(FieldValue::Number(1999.0).to_string(), "1999");
        assert_eq!(FieldValue::Number(4.2).to_string(), "4.2");
        assert_eq!(FieldValue::Number(-3.0).to_string(), "-3");
        assert_eq!(FieldValue::Integer(0).to_string(), "0");
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Empty);
        assert_eq!(FieldValue::from(Some("2024-01-15".to_string())).to_string(), "2024-01-15");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }
}
