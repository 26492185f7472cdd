use actix_web_csp_nonce::core::{
    CspPolicy, CspPolicyBuilder, DirectiveValue, NormalizedPolicy, Source, TokenList,
};
use actix_web_csp_nonce::CspError;
use smallvec::smallvec;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_policy_creation() {
        let policy = CspPolicy::new();

        assert!(policy.is_empty());
        assert_eq!(policy.directives().count(), 0);
        assert!(!policy.uses_nonce_placeholder());
    }

    #[test]
    fn test_builder_keeps_insertion_order() {
        let policy = CspPolicyBuilder::new()
            .script_src([Source::Self_, Source::NoncePlaceholder])
            .default_src([Source::Self_])
            .disable("style-src")
            .directive("img-src", "'self' data:")
            .build()
            .unwrap();

        let names: Vec<&str> = policy.directives().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["script-src", "default-src", "style-src", "img-src"]);
        assert!(policy.uses_nonce_placeholder());
        assert_eq!(policy.get_directive("style-src"), Some(&DirectiveValue::Disabled));
    }

    #[test]
    fn test_builder_rejects_malformed_directive_name() {
        let result = CspPolicyBuilder::new()
            .directive("script src;", "'self'")
            .build();

        assert!(matches!(result, Err(CspError::InvalidDirectiveName(_))));
    }

    #[test]
    fn test_build_unchecked_passes_anything_through() {
        let policy = CspPolicyBuilder::new()
            .directive("x-unknown", "whatever")
            .build_unchecked();

        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_merge_overrides_existing_keys_in_place() {
        let mut base: CspPolicy = [("default-src", "'self'"), ("script-src", "'self'")]
            .into_iter()
            .collect();
        let overlay: CspPolicy = [
            ("script-src", DirectiveValue::Disabled),
            ("img-src", DirectiveValue::raw("data:")),
        ]
        .into_iter()
        .collect();

        base.merge(&overlay);

        let names: Vec<&str> = base.directives().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["default-src", "script-src", "img-src"]);
        assert_eq!(base.get_directive("script-src"), Some(&DirectiveValue::Disabled));
    }

    #[test]
    fn test_remove_directive() {
        let mut policy = CspPolicy::new();
        policy.set_directive("default-src", "'self'");
        policy.set_directive("script-src", "'self'");

        assert!(policy.remove_directive("default-src").is_some());
        assert!(policy.remove_directive("default-src").is_none());
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_policy_deserializes_from_json_map() {
        let policy: CspPolicy = serde_json::from_str(
            r#"{
                "script-src": "'self' 'nonce-{{nonce}}'",
                "style-src": false,
                "img-src": ["'self'", "data:"]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = policy.directives().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["script-src", "style-src", "img-src"]);
        assert!(policy.get_directive("style-src").unwrap().is_disabled());
    }

    #[test]
    fn test_normalized_policy_nonces() {
        let mut normalized = NormalizedPolicy::new();
        let script: TokenList = smallvec!["'self'".to_string(), "'nonce-N1'".to_string()];
        let style: TokenList = smallvec!["'nonce-N1'".to_string()];
        normalized.insert("script-src", script);
        normalized.insert("style-src", style);

        let nonces: Vec<&str> = normalized.nonces().collect();
        assert_eq!(nonces, vec!["N1", "N1"]);
        assert!(normalized.contains_directive("script-src"));
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_normalized_policy_converts_back_to_token_lists() {
        let mut normalized = NormalizedPolicy::new();
        normalized.insert("default-src", smallvec!["'self'".to_string()]);

        let policy = CspPolicy::from(&normalized);
        assert_eq!(
            policy.get_directive("default-src"),
            Some(&DirectiveValue::tokens(["'self'"]))
        );
    }
}
