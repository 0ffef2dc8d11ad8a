//! Naming heuristics for generated contracts.

use regex::Regex;

/// Derives the agent-noun trait name from a type name.
///
/// `Store` becomes `Storer`, `Manager` stays `Manager`, anything else
/// gets an `er` suffix (`Bar` becomes `Barer`).
pub fn derive_trait_name(type_name: &str) -> String {
    if type_name.ends_with("er") {
        return type_name.to_string();
    }
    if type_name.ends_with('e') {
        return format!("{type_name}r");
    }
    format!("{type_name}er")
}

/// Derives the output file name for a trait: snake case of the trait
/// name with a `_gen.rs` suffix.
pub fn derive_file_name(trait_name: &str) -> String {
    let upper = Regex::new("[A-Z]").unwrap();
    let snake = upper
        .replace_all(trait_name, |caps: &regex::Captures<'_>| {
            format!("_{}", caps[0].to_lowercase())
        })
        .into_owned();
    let snake = snake.strip_prefix('_').unwrap_or(&snake);
    format!("{snake}_gen.rs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_name_suffix_rules() {
        assert_eq!(derive_trait_name("Bar"), "Barer");
        assert_eq!(derive_trait_name("Store"), "Storer");
        assert_eq!(derive_trait_name("Manager"), "Manager");
        assert_eq!(derive_trait_name("Writer"), "Writer");
        assert_eq!(derive_trait_name("Cache"), "Cacher");
    }

    #[test]
    fn test_file_name_snake_cases_and_suffixes() {
        assert_eq!(derive_file_name("Barer"), "barer_gen.rs");
        assert_eq!(derive_file_name("HttpStorer"), "http_storer_gen.rs");
        assert_eq!(derive_file_name("X"), "x_gen.rs");
    }
}
