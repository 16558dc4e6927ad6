use serde_json::Value;

use crate::core::errors::{AppError, AppResult};
use crate::core::types::GroupingCluster;

/// Takes the first bracketed span of `text` that parses as a list of name lists.
pub fn parse_clusters(text: &str) -> AppResult<Vec<GroupingCluster>> {
    let value = first_json_list(text).ok_or_else(|| {
        AppError::InvalidInput("no JSON list of project groups found".to_string())
    })?;

    let Value::Array(groups) = value else {
        return Err(AppError::InvalidInput("project groups must be a list".to_string()));
    };

    Ok(groups
        .into_iter()
        .filter_map(|group| match group {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(name) => Some(name),
                        _ => None,
                    })
                    .collect::<GroupingCluster>(),
            ),
            _ => None,
        })
        .collect())
}

fn first_json_list(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, ch)| *ch == '[')
        .find_map(|(start, _)| {
            let end = matching_bracket(&text[start..])?;
            serde_json::from_str::<Value>(&text[start..start + end + 1])
                .ok()
                .filter(Value::is_array)
        })
}

/// Byte offset of the `]` closing the `[` at the start of `text`, skipping
/// brackets inside JSON strings.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
