//! The `tavily_search` tool exposed to the research agent.

use serde::Deserialize;

use super::SearchHit;
use crate::types::ToolDefinition;

pub const TOOL_NAME: &str = "tavily_search";

/// Input the model sends when it calls the tool
#[derive(Debug, Deserialize)]
pub struct SearchToolInput {
    pub query: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: "Search the web for up-to-date travel information: attractions, activities, \
                      restaurants, lodging and local tips. Returns a short list of results with \
                      title, URL and a relevant excerpt."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Parse the tool input, rejecting blank queries
pub fn parse_input(input: &serde_json::Value) -> Result<SearchToolInput, String> {
    let parsed: SearchToolInput =
        serde_json::from_value(input.clone()).map_err(|e| format!("Invalid tavily_search input: {}", e))?;
    if parsed.query.trim().is_empty() {
        return Err("tavily_search requires a non-empty query".to_string());
    }
    Ok(parsed)
}

/// Render hits as the text returned to the model
pub fn render_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results found for \"{}\".", query);
    }

    let mut output = format!("Results for \"{}\":\n", query);
    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!("\n{}. {}\n   URL: {}\n   {}\n", i + 1, hit.title, hit.url, hit.content.trim()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_schema() {
        let def = definition();
        assert_eq!(def.name, "tavily_search");
        assert_eq!(def.input_schema["required"][0], "query");
    }

    #[test]
    fn test_parse_input() {
        let ok = parse_input(&serde_json::json!({"query": "Jeju hotels"})).unwrap();
        assert_eq!(ok.query, "Jeju hotels");
        assert!(parse_input(&serde_json::json!({"query": "  "})).is_err());
        assert!(parse_input(&serde_json::json!({"q": "Jeju"})).is_err());
    }

    #[test]
    fn test_render_hits() {
        let hits = vec![SearchHit {
            title: "Hallasan National Park".to_string(),
            url: "https://example.test/hallasan".to_string(),
            content: "South Korea's highest mountain. ".to_string(),
            score: 0.92,
        }];
        let rendered = render_hits("Jeju hiking", &hits);
        assert!(rendered.contains("1. Hallasan National Park"));
        assert!(rendered.contains("URL: https://example.test/hallasan"));
        assert!(render_hits("nothing", &[]).contains("No results found"));
    }
}
