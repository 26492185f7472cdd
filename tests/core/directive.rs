use actix_web_csp_nonce::core::{DirectiveValue, Source};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_each_shape() {
        let disabled: DirectiveValue = serde_json::from_str("false").unwrap();
        assert_eq!(disabled, DirectiveValue::Disabled);

        let enabled_flag: DirectiveValue = serde_json::from_str("true").unwrap();
        assert!(enabled_flag.is_disabled());

        let raw: DirectiveValue = serde_json::from_str(r#""'self' https:""#).unwrap();
        assert_eq!(raw, DirectiveValue::raw("'self' https:"));

        let list: DirectiveValue = serde_json::from_str(r#"["'self'", "https:"]"#).unwrap();
        assert_eq!(list, DirectiveValue::tokens(["'self'", "https:"]));
    }

    #[test]
    fn test_serialize_shapes() {
        assert_eq!(serde_json::to_string(&DirectiveValue::Disabled).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&DirectiveValue::raw("'self'")).unwrap(),
            r#""'self'""#
        );
        assert_eq!(
            serde_json::to_string(&DirectiveValue::tokens(["a", "b"])).unwrap(),
            r#"["a","b"]"#
        );
    }

    #[test]
    fn test_token_iter_splits_raw_strings() {
        let value = DirectiveValue::raw("  'self'   https://a.example\t'nonce-{{nonce}}' ");
        let tokens: Vec<&str> = value.token_iter().collect();

        assert_eq!(tokens, vec!["'self'", "https://a.example", "'nonce-{{nonce}}'"]);
        assert!(value.uses_nonce_placeholder());
    }

    #[test]
    fn test_token_iter_of_disabled_is_empty() {
        assert_eq!(DirectiveValue::Disabled.token_iter().count(), 0);
        assert!(!DirectiveValue::Disabled.uses_nonce_placeholder());
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(DirectiveValue::from(false), DirectiveValue::Disabled);
        assert_eq!(DirectiveValue::from("'self'"), DirectiveValue::raw("'self'"));
        assert_eq!(
            DirectiveValue::sources([Source::Self_, Source::NoncePlaceholder]),
            DirectiveValue::tokens(["'self'", "'nonce-{{nonce}}'"])
        );
    }
}
