//! Hierarchy levels inferred from a project label.
//!
//! Labels follow loose conventions: `"NU Gate"` is sub-project `Gate` of `NU`,
//! `"Project (Sub)"` is `Sub` of `Project`, and `"Main Sub (Detail)"` nests
//! three deep. This is a heuristic; it never fails and at worst returns the
//! label itself as a single level.

/// Splits `"<main> (<detail>)"` at the first `(` that has a closing `)` after it.
pub fn split_parenthesized(name: &str) -> Option<(&str, &str)> {
    let open = name.find('(')?;
    let close = open + 1 + name[open + 1..].find(')')?;
    Some((name[..open].trim(), name[open + 1..close].trim()))
}

/// Splits at the first space: `"NU Gate Alpha"` → `("NU", "Gate Alpha")`.
pub fn split_first_word(name: &str) -> Option<(&str, &str)> {
    let (head, rest) = name.split_once(' ')?;
    Some((head, rest.trim()))
}

pub fn parse_hierarchy(raw_name: &str) -> Vec<String> {
    let name = raw_name.trim();

    let levels: Vec<&str> = if let Some((main, detail)) = split_parenthesized(name) {
        match split_first_word(main) {
            Some((top, mid)) => vec![top, mid, detail],
            None => vec![main, detail],
        }
    } else if let Some((head, rest)) = split_first_word(name) {
        vec![head, rest]
    } else {
        vec![name]
    };

    let levels: Vec<String> = levels
        .into_iter()
        .filter(|level| !level.is_empty())
        .map(str::to_string)
        .collect();
    if levels.is_empty() {
        vec![name.to_string()]
    } else {
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_split_uses_first_closed_group() {
        assert_eq!(
            split_parenthesized("Main Sub (Detail) (Other)"),
            Some(("Main Sub", "Detail"))
        );
        assert_eq!(split_parenthesized("Main (unclosed"), None);
    }

    #[test]
    fn first_word_split_needs_a_space() {
        assert_eq!(split_first_word("NU"), None);
        assert_eq!(split_first_word("NU  Gate"), Some(("NU", "Gate")));
    }
}
