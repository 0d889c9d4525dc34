//! Turning the model's free-form reply into JSON.
use serde_json::Value;
use thiserror::Error;

/// The reply was not valid JSON. Keeps the unmodified reply for diagnosis.
#[derive(Debug, Error)]
#[error("model reply is not valid JSON: {source}")]
pub struct ResponseFormatError {
    raw: String,
    #[source]
    source: serde_json::Error,
}

impl ResponseFormatError {
    /// The reply exactly as the model returned it.
    pub fn raw_response(&self) -> &str {
        &self.raw
    }
}

/// How forgiving to be with a reply before parsing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    /// Only surrounding whitespace is ignored.
    Strict,
    /// Markdown code-fence markers are removed as well.
    Fenced,
}

impl ReplyFormat {
    pub fn parse(self, raw: &str) -> Result<Value, ResponseFormatError> {
        let result = match self {
            ReplyFormat::Strict => serde_json::from_str(raw.trim()),
            ReplyFormat::Fenced => serde_json::from_str(&strip_code_fences(raw)),
        };
        result.map_err(|source| ResponseFormatError {
            raw: raw.to_string(),
            source,
        })
    }
}

/// Trims the reply and removes every ```` ```json ```` and ```` ``` ```` marker in it.
pub fn strip_code_fences(text: &str) -> String {
    text.trim().replace("```json", "").replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_ignores_surrounding_whitespace() {
        let value = ReplyFormat::Strict
            .parse("\n  {\"company\": \"Acme Corp\"}  \n")
            .unwrap();
        assert_eq!(value, json!({"company": "Acme Corp"}));
    }

    #[test]
    fn strict_rejects_fenced_reply_and_keeps_raw_text() {
        let raw = "```json\n{\"company\": \"Acme Corp\"}\n```";
        let err = ReplyFormat::Strict.parse(raw).unwrap_err();
        assert_eq!(err.raw_response(), raw);
    }

    #[test]
    fn fenced_reply_is_unwrapped() {
        let raw = "```json\n{\"company\":\"Acme Corp\",\"invoice_number\":\"123\",\"total\":45.00}\n```";
        let value = ReplyFormat::Fenced.parse(raw).unwrap();
        assert_eq!(
            value,
            json!({"company": "Acme Corp", "invoice_number": "123", "total": 45.00})
        );
    }

    #[test]
    fn bare_fences_are_removed() {
        assert_eq!(strip_code_fences("  ```\n[1, 2]\n```  "), "\n[1, 2]\n");
    }

    #[test]
    fn prose_is_still_an_error_when_fenced() {
        let raw = "Sure! Here is the JSON you asked for.";
        let err = ReplyFormat::Fenced.parse(raw).unwrap_err();
        assert_eq!(err.raw_response(), raw);
        assert!(err.to_string().starts_with("model reply is not valid JSON"));
    }

    #[test]
    fn key_order_is_preserved() {
        let value = ReplyFormat::Strict.parse(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
