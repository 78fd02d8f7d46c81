//! Helpers for turning free-form model replies into something parseable.

/// Locate the JSON object in a model reply.
///
/// Models asked for JSON still wrap it in markdown fences or a sentence of
/// preamble now and then. This strips fences and then narrows to the outermost
/// `{ ... }`. Replies without braces are returned trimmed.
pub fn json_payload(reply: &str) -> &str {
    let unfenced = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}

/// At most `max_bytes` of `text`, cut on a char boundary. For log lines.
pub fn preview(text: &str, max_bytes: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        assert_eq!(json_payload("```json\n{\"risk\": \"High\"}\n```"), "{\"risk\": \"High\"}");
        assert_eq!(json_payload("```\n{}\n```"), "{}");
        assert_eq!(json_payload("  {}  "), "{}");
    }

    #[test]
    fn preamble_is_dropped() {
        let reply = "Here is the analysis:\n{\"risk\": \"Low\"}\nStay safe.";
        assert_eq!(json_payload(reply), "{\"risk\": \"Low\"}");
    }

    #[test]
    fn replies_without_objects_pass_through() {
        assert_eq!(json_payload(" no data "), "no data");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = "Hello 世界";
        let cut = preview(text, 8);
        assert_eq!(cut, "Hello ");
        assert_eq!(preview("Hello", 100), "Hello");
        assert_eq!(preview("世界", 2), "");
    }
}
