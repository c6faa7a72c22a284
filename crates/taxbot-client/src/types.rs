//! Wire types exchanged with the tax endpoint

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Body of a tax calculation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxRequest {
    /// Annual income, always > 0
    #[serde(serialize_with = "serialize_number")]
    pub income: f64,
    /// Lower-cased country code
    pub country: String,
}

impl TaxRequest {
    pub fn new(income: f64, country: impl Into<String>) -> Self {
        Self {
            income,
            country: country.into(),
        }
    }
}

/// Structured reply from the tax endpoint, with both fields already rendered as text
#[derive(Debug, Clone, PartialEq)]
pub struct TaxReply {
    pub tax_amount: String,
    pub classification: String,
}

impl TaxReply {
    /// Read `taxAmount` and `classification` from a JSON object.
    ///
    /// Any truthy value is accepted for either field; `null`, `false`, `0`,
    /// `""` or a missing key means there is no structured reply.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let tax_amount = fields.get("taxAmount").filter(|v| is_truthy(v))?;
        let classification = fields.get("classification").filter(|v| is_truthy(v))?;

        Some(Self {
            tax_amount: display_value(tax_amount),
            classification: display_value(classification),
        })
    }

    /// Sentence shown to the user for this reply
    pub fn summary(&self) -> String {
        format!(
            "Your estimated tax is ${}. Classification: {}. Would you like to calculate again?",
            self.tax_amount, self.classification
        )
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text a value interpolates to in a browser template string
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        // f64 display drops the trailing `.0`, so 1200.0 reads as 1200
        Value::Number(n) => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Write integral values as JSON integers so `50000.0` goes out as `50000`
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
