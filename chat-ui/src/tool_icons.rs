/// Glyph shown next to a built-in tool or tool call
pub fn tool_icon(tool_id: &str) -> &'static str {
    match tool_id {
        "web_search" | "web_search_preview" => "🔎",
        "code_execution" => "⌨",
        "image_generation" => "🖼",
        "url_context" | "web_fetch" => "🔗",
        "memory" => "🧠",
        "file_search" => "📁",
        _ => "🔧",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_have_distinct_icons() {
        let known = ["web_search", "code_execution", "image_generation", "url_context", "memory"];
        let icons: std::collections::HashSet<_> = known.iter().map(|id| tool_icon(id)).collect();
        assert_eq!(icons.len(), known.len());
        assert!(!icons.contains(tool_icon("unknown")));
    }

    #[test]
    fn unknown_tools_fall_back_to_wrench() {
        assert_eq!(tool_icon("lookup_weather"), "🔧");
    }
}
