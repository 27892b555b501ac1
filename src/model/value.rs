use std::fmt;

/// Tokens read as a missing cell, matching the usual dataframe NA defaults.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// One cell of the employee table. Numeric cells keep their trimmed source
/// text, so textual lookups and exports see what the file holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64, String),
    Text(String),
    Missing,
}

impl Value {
    /// Type a raw CSV field: NA token, then number, then text.
    pub fn parse(raw: &str) -> Value {
        let s = raw.trim();
        if NA_TOKENS.contains(&s) {
            return Value::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_nan() => Value::Missing,
            Ok(v) => Value::Number(v, s.to_string()),
            Err(_) => Value::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell; text in a numeric context counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v, _) => Some(*v),
            _ => None,
        }
    }

    /// Source text of any non-missing cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_, s) | Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(_, s) | Value::Text(s) => write!(f, "{s}"),
            Value::Missing => Ok(()),
        }
    }
}
