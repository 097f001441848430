//! List type tokens: `list` for inferred elements, `list<element>` for hinted ones.
use crate::magic::TYPE_LIST;

/// Token for a list fragment, with an optional element hint.
pub fn list_token(hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("{}<{}>", TYPE_LIST, hint),
        None => TYPE_LIST.to_string(),
    }
}

/// Splits a list token into its element hint.
///
/// Returns `None` if `type_id` is not in the list family, `Some(None)` for a bare
/// `list`, and `Some(Some(hint))` for `list<hint>`.
pub fn parse_list_token(type_id: &str) -> Option<Option<&str>> {
    let rest = type_id.strip_prefix(TYPE_LIST)?;
    if rest.is_empty() {
        return Some(None);
    }

    let hint = rest.strip_prefix('<')?.strip_suffix('>')?;
    if hint.is_empty() { None } else { Some(Some(hint)) }
}

/// Family of a type token: all list tokens collapse to `list`, others are unchanged.
pub fn type_family(type_id: &str) -> &str {
    if parse_list_token(type_id).is_some() {
        TYPE_LIST
    } else {
        type_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_families() {
        assert_eq!(list_token(None), "list");
        assert_eq!(list_token(Some("int32")), "list<int32>");

        assert_eq!(parse_list_token("list"), Some(None));
        assert_eq!(parse_list_token("list<int32>"), Some(Some("int32")));
        assert_eq!(parse_list_token("list<list<bool>>"), Some(Some("list<bool>")));
        assert_eq!(parse_list_token("list<>"), None);
        assert_eq!(parse_list_token("listing"), None);
        assert_eq!(parse_list_token("int32"), None);

        assert_eq!(type_family("list<list>"), "list");
        assert_eq!(type_family("Foo"), "Foo");
    }
}
