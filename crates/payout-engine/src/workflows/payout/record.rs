use super::lob::LineOfBusiness;
use super::payin::{self, PayinCategory};
use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_POLICY_TYPE: &str = "Comp";
const DEFAULT_LOCATION: &str = "N/A";

/// Rejection reasons for an extracted entry that cannot be read as a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("field '{field}' must be text or a number, got {kind}")]
    UnexpectedField {
        field: &'static str,
        kind: &'static str,
    },
}

/// One entry as the extractor reported it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub segment: String,
    pub policy_type: String,
    pub location: String,
    pub payin: Value,
    pub remark: String,
}

impl RawRecord {
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let object = value
            .as_object()
            .ok_or_else(|| RecordError::NotAnObject(json_kind(value)))?;

        Ok(Self {
            segment: scalar_field(object, "segment")?.unwrap_or_default(),
            policy_type: scalar_field(object, "policy_type")?
                .unwrap_or_else(|| DEFAULT_POLICY_TYPE.to_string()),
            location: scalar_field(object, "location")?
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            payin: object.get("payin").cloned().unwrap_or(Value::Null),
            remark: remark_field(object.get("remark")),
        })
    }

    pub fn classify(self) -> ClassifiedRecord {
        let classified = payin::classify(&self.payin);
        ClassifiedRecord {
            raw: self,
            payin_value: classified.value,
            payin_category: classified.category,
        }
    }
}

fn scalar_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, RecordError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(RecordError::UnexpectedField {
            field,
            kind: json_kind(other),
        }),
    }
}

/// Remarks occasionally come back as a list of fragments.
fn remark_field(value: Option<&Value>) -> String {
    let joined = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => display_value(other),
    };
    joined.trim().to_string()
}

/// Renders a JSON value the way a person would type it into a cell.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    pub payin_value: f64,
    pub payin_category: PayinCategory,
}

impl ClassifiedRecord {
    pub fn line_of_business(&self) -> LineOfBusiness {
        LineOfBusiness::resolve(&self.raw.segment)
    }
}

/// Final per-record result of the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedRecord {
    #[serde(flatten)]
    pub classified: ClassifiedRecord,
    pub payout_value: f64,
    pub matched_formula: String,
    pub explanation: String,
}

/// Placeholder for an entry that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRecord {
    pub segment: String,
    pub policy_type: String,
    pub location: String,
    pub payin: String,
    pub remark: String,
    pub error: String,
}

impl FailedRecord {
    /// Salvages whatever text the entry carried so the row stays recognizable.
    pub fn from_value(value: &Value, error: &RecordError) -> Self {
        let field = |name: &str, fallback: &str| {
            value
                .get(name)
                .filter(|field| !field.is_null())
                .map(display_value)
                .unwrap_or_else(|| fallback.to_string())
        };

        let segment = match value {
            Value::Object(_) => field("segment", "Unknown"),
            other => display_value(other),
        };

        Self {
            segment,
            policy_type: field("policy_type", DEFAULT_POLICY_TYPE),
            location: field("location", DEFAULT_LOCATION),
            payin: field("payin", "0%"),
            remark: field("remark", "Error"),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Calculated(CalculatedRecord),
    Failed(FailedRecord),
}

impl RecordOutcome {
    pub fn segment(&self) -> &str {
        match self {
            Self::Calculated(record) => &record.classified.raw.segment,
            Self::Failed(record) => &record.segment,
        }
    }

    pub fn formula_label(&self) -> &str {
        match self {
            Self::Calculated(record) => &record.matched_formula,
            Self::Failed(_) => "Error",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn as_calculated(&self) -> Option<&CalculatedRecord> {
        match self {
            Self::Calculated(record) => Some(record),
            Self::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_record_with_defaults() {
        let raw = RawRecord::from_value(&json!({ "segment": "TAXI", "payin": "25%" }))
            .expect("object parses");
        assert_eq!(raw.segment, "TAXI");
        assert_eq!(raw.policy_type, "Comp");
        assert_eq!(raw.location, "N/A");
        assert_eq!(raw.remark, "");

        let classified = raw.classify();
        assert_eq!(classified.payin_value, 25.0);
        assert_eq!(classified.payin_category, PayinCategory::TwentyOneToThirty);
        assert_eq!(classified.line_of_business(), LineOfBusiness::Taxi);
    }

    #[test]
    fn joins_list_remarks() {
        let raw = RawRecord::from_value(&json!({
            "segment": "TW TP",
            "remark": ["  Tata", "upto 2 years "],
        }))
        .expect("object parses");
        assert_eq!(raw.remark, "Tata upto 2 years");
    }

    #[test]
    fn rejects_non_objects_and_nested_segments() {
        assert_eq!(
            RawRecord::from_value(&json!("TW TP 30%")),
            Err(RecordError::NotAnObject("a string"))
        );
        assert_eq!(
            RawRecord::from_value(&json!({ "segment": { "name": "TW" } })),
            Err(RecordError::UnexpectedField {
                field: "segment",
                kind: "an object"
            })
        );
    }

    #[test]
    fn failed_record_keeps_original_text() {
        let value = json!({ "segment": ["TW"], "payin": 30, "location": "Pune" });
        let error = RawRecord::from_value(&value).expect_err("segment list is malformed");
        let failed = FailedRecord::from_value(&value, &error);
        assert_eq!(failed.segment, "[\"TW\"]");
        assert_eq!(failed.payin, "30");
        assert_eq!(failed.location, "Pune");
        assert_eq!(failed.remark, "Error");
        assert!(failed.error.contains("segment"));

        let bare = json!(42);
        let error = RawRecord::from_value(&bare).expect_err("numbers are not records");
        let failed = FailedRecord::from_value(&bare, &error);
        assert_eq!(failed.segment, "42");
        assert_eq!(failed.payin, "0%");
    }
}
