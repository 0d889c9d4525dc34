//! The instruction frame sent to the model around OCR text.

/// Builds the structuring prompt for one document's OCR text.
///
/// The model decides the schema; the frame only asks for a single bare JSON object.
pub fn create_prompt(text: &str) -> String {
    format!(
        r#"
    You are an expert in document understanding. Analyze the following OCR-extracted text and return all relevant structured data as a single JSON object.
    Include any fields you can identify, such as company, address, product, nutrition, invoice details, contact, etc.

    Only return valid JSON. Do not add any text before or after the JSON object. Do not use Markdown backticks like ```json.

    Text:
    ---
    {text}
    ---
    "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_framed_between_delimiters() {
        let prompt = create_prompt("Acme Corp Invoice #123 Total: $45.00");
        let start = prompt.find("---").unwrap();
        let end = prompt.rfind("---").unwrap();
        assert!(start < end);
        assert!(prompt[start..end].contains("Acme Corp Invoice #123 Total: $45.00"));
    }

    #[test]
    fn forbids_prose_and_fences() {
        let prompt = create_prompt("anything");
        assert!(prompt.contains("single JSON object"));
        assert!(prompt.contains("Do not add any text before or after"));
        assert!(prompt.contains("Do not use Markdown backticks"));
    }

    #[test]
    fn braces_in_text_are_passed_through() {
        let prompt = create_prompt("{\"already\": \"json\"}");
        assert!(prompt.contains("{\"already\": \"json\"}"));
    }
}
