//! `{{identifier}}` プレースホルダーの抽出と置換
//!
//! 識別子はASCIIの英数字とアンダースコアのみ。ネストや式評価は行わない。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

/// プレースホルダーパターン
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
});

/// 本文中のプレースホルダー名を出現順・重複なしで抽出
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for caps in PLACEHOLDER.captures_iter(text) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if seen.insert(name) {
            variables.push(name.to_string());
        }
    }

    variables
}

/// プレースホルダーを値で置換
///
/// `values` にキーがないプレースホルダーは波括弧ごとそのまま残す。
/// 置換は一度きりで、値の中のプレースホルダーは再展開しない。
pub fn render(body: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// 抽出済み変数のうち `values` に含まれないものを返す
pub fn unresolved(variables: &[String], values: &HashMap<String, String>) -> Vec<String> {
    variables
        .iter()
        .filter(|name| !values.contains_key(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_first_appearance_order() {
        assert_eq!(extract_variables("{{a}}{{b}}{{a}}"), vec!["a", "b"]);
        assert_eq!(
            extract_variables("Review this {{language}} code:\n{{code}}"),
            vec!["language", "code"]
        );
    }

    #[test]
    fn test_extract_ignores_non_identifiers() {
        assert!(extract_variables("no placeholders here").is_empty());
        assert!(extract_variables("{{ spaced }} {{with-dash}} {single}").is_empty());
        assert_eq!(extract_variables("{{{triple}}}"), vec!["triple"]);
        assert_eq!(extract_variables("{{snake_case_2}}"), vec!["snake_case_2"]);
    }

    #[test]
    fn test_render_partial_substitution() {
        let body = "Review this {{language}} code:\n{{code}}";
        let rendered = render(body, &values(&[("language", "TypeScript")]));
        assert_eq!(rendered, "Review this TypeScript code:\n{{code}}");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let body = "plain text with {braces} and }} stray";
        assert_eq!(render(body, &values(&[("braces", "x")])), body);
        assert_eq!(render(body, &HashMap::new()), body);
    }

    #[test]
    fn test_render_is_single_pass() {
        let body = "{{a}} and {{b}}";
        let rendered = render(body, &values(&[("a", "{{b}}"), ("b", "B")]));
        assert_eq!(rendered, "{{b}} and B");
    }

    #[test]
    fn test_render_is_case_sensitive() {
        let rendered = render("{{Name}} {{name}}", &values(&[("name", "x")]));
        assert_eq!(rendered, "{{Name}} x");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let rendered = render("{{x}}-{{x}}-{{y}}", &values(&[("x", "1")]));
        assert_eq!(rendered, "1-1-{{y}}");
    }

    #[test]
    fn test_unresolved_is_set_difference() {
        let variables = vec!["language".to_string(), "code".to_string()];
        assert_eq!(
            unresolved(&variables, &values(&[("language", "Rust"), ("extra", "y")])),
            vec!["code"]
        );
        // 値の中に変数名が出てきても影響しない
        assert_eq!(
            unresolved(&variables, &values(&[("language", "{{code}}")])),
            vec!["code"]
        );
        assert!(unresolved(&variables, &values(&[("language", ""), ("code", "")])).is_empty());
    }
}
