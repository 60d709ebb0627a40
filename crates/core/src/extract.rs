use regex::Regex;
use std::sync::OnceLock;

/// A fence that wraps the whole reply. One line of prose ending in a colon
/// may precede the opening fence and one line may follow the closing fence.
fn wrapping_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(
            r"(?s)\A(?:[^\n]*:[ \t]*\r?\n)?```[A-Za-z0-9_+#.\-]*[ \t]*\r?\n(?:(.*)\r?\n)?```[ \t]*(?:\r?\n[^\n]*)?\z",
        )
        .expect("fence pattern is valid")
    })
}

fn opening_fence() -> &'static Regex {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    OPENING.get_or_init(|| {
        Regex::new(r"\A```[A-Za-z0-9_+#.\-]*[ \t]*\r?\n").expect("opening fence pattern is valid")
    })
}

/// Extract clean source code from a batch model response.
///
/// Models sometimes ignore the "no markdown" instruction. Only a fence that
/// wraps the reply is removed, together with at most one line of commentary
/// on either side of it. Fences inside the code itself, such as a markdown
/// example in a docstring, are kept. A response cut off before its closing
/// fence loses only the opening fence line. Anything else is returned trimmed.
pub fn extract_code(response: &str) -> String {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(captures) = wrapping_fence().captures(trimmed) {
        let body = captures.get(1).map_or("", |body| body.as_str());
        return body.trim_matches('\n').to_string();
    }

    opening_fence().replace(trimmed, "").trim().to_string()
}
