/// Names from the roster that appear in the body. Plain case-sensitive
/// substring matching; Korean personal names collide rarely enough with
/// common nouns that the occasional false positive is accepted. Result is in
/// roster order, deduplicated.
pub fn extract_mentions(body: &str, names: &[String]) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }
    let mut found = Vec::new();
    for name in names {
        if !name.is_empty() && body.contains(name.as_str()) && !found.contains(name) {
            found.push(name.clone());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_names_as_substrings() {
        let names = roster(&["이재명", "한동훈", "조국"]);
        let body = "이재명 대표는 한동훈 전 위원장의 발언을 비판했다.";
        assert_eq!(extract_mentions(body, &names), vec!["이재명", "한동훈"]);
    }

    #[test]
    fn empty_body_matches_nothing() {
        let names = roster(&["이재명"]);
        assert!(extract_mentions("", &names).is_empty());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let names = roster(&["Kim"]);
        assert!(extract_mentions("kim said nothing", &names).is_empty());
        assert_eq!(extract_mentions("Kim said nothing", &names), vec!["Kim"]);
    }

    #[test]
    fn repeated_mentions_collapse() {
        let names = roster(&["이재명"]);
        let body = "이재명, 이재명, 또 이재명";
        assert_eq!(extract_mentions(body, &names), vec!["이재명"]);
    }

    #[test]
    fn preserves_roster_order() {
        let names = roster(&["조국", "이재명"]);
        let body = "이재명과 조국이 만났다";
        assert_eq!(extract_mentions(body, &names), vec!["조국", "이재명"]);
    }
}
