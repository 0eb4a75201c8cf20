use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Records recovered from a model reply, plus the JSON text they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    pub json: String,
    pub records: Vec<Value>,
}

impl ParsedReply {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```json\s*|\s*```").expect("fence pattern compiles"))
}

/// Models wrap the array in fences or prose often enough that the first `[`
/// through the last `]` is what gets parsed. Anything unusable yields an empty
/// reply rather than an error.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let cleaned = fence_pattern().replace_all(raw.trim(), "");
    let cleaned = cleaned.trim();

    let candidate = match (cleaned.find('['), cleaned.rfind(']')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => cleaned,
    };

    let records = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Array(items)) => items,
        Ok(object @ Value::Object(_)) => vec![object],
        _ => return ParsedReply::default(),
    };

    ParsedReply {
        json: candidate.to_string(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_markdown_fences() {
        let reply = "```json\n[{\"segment\": \"TAXI\", \"payin\": 25}]\n```";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.records, vec![json!({ "segment": "TAXI", "payin": 25 })]);
        assert_eq!(parsed.json, "[{\"segment\": \"TAXI\", \"payin\": 25}]");
    }

    #[test]
    fn takes_outermost_array_from_prose() {
        let reply = "Here is the data you asked for:\n[{\"segment\": \"TW TP\"}, {\"segment\": \"1+5\"}]\nLet me know [if] needed";
        // The trailing "[if]" pushes the last bracket past the array, so nothing parses.
        assert!(parse_reply(reply).is_empty());

        let reply = "Sure! [{\"segment\": \"TW TP\"}, {\"segment\": \"1+5\"}] Done.";
        assert_eq!(parse_reply(reply).records.len(), 2);
    }

    #[test]
    fn single_object_becomes_one_record() {
        let parsed = parse_reply("{\"segment\": \"STAFF BUS\", \"payin\": 62.5}");
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn garbage_and_scalars_yield_nothing() {
        assert!(parse_reply("").is_empty());
        assert!(parse_reply("I could not read the image.").is_empty());
        assert!(parse_reply("[not json]").is_empty());
        assert!(parse_reply("42").is_empty());
        assert_eq!(parse_reply("[]"), ParsedReply { json: "[]".to_string(), records: Vec::new() });
    }
}
