use actix_web_csp_nonce::core::{
    CspConfig, CspConfigBuilder, CspPolicy, DirectiveValue, ResolvedSecurity, RouteRules,
    RouteSecurity, Setting,
};
use actix_web_csp_nonce::CspError;
use std::io::Write;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn policy(pairs: &[(&str, &str)]) -> CspPolicy {
    pairs.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/**", "/", true ; "catch all matches root")]
    #[test_case("/**", "/deep/nested/page", true ; "catch all matches nested")]
    #[test_case("/admin/**", "/admin", true ; "prefix matches itself")]
    #[test_case("/admin/**", "/admin/users", true ; "prefix matches child")]
    #[test_case("/admin/**", "/administrator", false ; "prefix respects segment boundary")]
    #[test_case("/about", "/about/", true ; "exact ignores trailing slash")]
    #[test_case("/about", "/about/team", false ; "exact does not match child")]
    fn test_route_matching(pattern: &'static str, path: &str, matches: bool) {
        let rules = RouteRules::new().rule(pattern, RouteSecurity::new().with_nonce(true));

        assert_eq!(rules.resolve(path).nonce, matches);
    }

    #[test]
    fn test_unmatched_path_resolves_to_nothing() {
        let rules = RouteRules::new().rule(
            "/app/**",
            RouteSecurity::new().with_policy(policy(&[("default-src", "'self'")])),
        );

        assert_eq!(rules.resolve("/other"), ResolvedSecurity::default());
    }

    #[test]
    fn test_specific_rules_override_general_ones() {
        let rules = RouteRules::new()
            .rule(
                "/api/public",
                RouteSecurity::new().with_nonce(false),
            )
            .rule(
                "/**",
                RouteSecurity::new()
                    .with_nonce(true)
                    .with_policy(policy(&[
                        ("default-src", "'self'"),
                        ("script-src", "'self' 'nonce-{{nonce}}'"),
                    ])),
            )
            .rule(
                "/api/**",
                RouteSecurity::new().with_policy(policy(&[("script-src", "'none'")])),
            );

        let resolved = rules.resolve("/api/public");
        assert!(!resolved.nonce);
        let merged = resolved.policy.unwrap();
        assert_eq!(
            merged.get_directive("script-src"),
            Some(&DirectiveValue::raw("'none'"))
        );
        assert_eq!(
            merged.get_directive("default-src"),
            Some(&DirectiveValue::raw("'self'"))
        );

        let resolved = rules.resolve("/home");
        assert!(resolved.nonce);
        assert!(resolved.policy.unwrap().uses_nonce_placeholder());
    }

    #[test]
    fn test_disabling_csp_or_headers_on_a_route() {
        let rules = RouteRules::global(
            RouteSecurity::new().with_policy(policy(&[("default-src", "'self'")])),
        )
        .rule("/raw/**", RouteSecurity::new().without_policy())
        .rule("/bare", RouteSecurity::new().without_headers());

        assert!(rules.resolve("/").policy.is_some());
        assert!(rules.resolve("/raw/file").policy.is_none());
        assert!(rules.resolve("/bare").policy.is_none());
    }

    #[test]
    fn test_route_rules_from_json() {
        let rules = RouteRules::from_json_str(
            r#"{
                "/**": {
                    "security": {
                        "nonce": true,
                        "headers": {
                            "contentSecurityPolicy": {
                                "script-src": "'self' 'nonce-{{nonce}}'",
                                "style-src": false
                            },
                            "xFrameOptions": "DENY"
                        }
                    }
                },
                "/legacy/**": {
                    "security": { "headers": { "contentSecurityPolicy": false } }
                },
                "/no-security": { "cache": { "maxAge": 60 } }
            }"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);

        let resolved = rules.resolve("/index");
        assert!(resolved.nonce);
        let csp = resolved.policy.unwrap();
        assert!(csp.get_directive("style-src").unwrap().is_disabled());

        let legacy = rules.resolve("/legacy/page");
        assert!(legacy.nonce);
        assert!(legacy.policy.is_none());
    }

    #[test]
    fn test_route_security_setting_shapes() {
        let security: RouteSecurity =
            serde_json::from_str(r#"{ "headers": false }"#).unwrap();
        assert_eq!(security.headers, Setting::Disabled);
        assert!(security.nonce.is_none());

        let security: RouteSecurity =
            serde_json::from_str(r#"{ "headers": true, "nonce": false }"#).unwrap();
        assert!(security.headers.is_unset());
        assert_eq!(security.nonce, Some(false));
    }

    #[test]
    fn test_route_rules_from_invalid_json() {
        let result = RouteRules::from_json_str("{ not json");

        assert!(matches!(result, Err(CspError::ConfigError(_))));
    }

    #[test]
    fn test_route_rules_from_file() {
        let path = std::env::temp_dir().join(format!(
            "csp-route-rules-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "/**": {{ "security": {{ "nonce": true }} }} }}"#
        )
        .unwrap();
        drop(file);

        let rules = RouteRules::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(rules.resolve("/").nonce);
    }

    #[test]
    fn test_route_rules_from_missing_file() {
        let result = RouteRules::from_file("/definitely/not/here/rules.json");

        assert!(matches!(result, Err(CspError::IoError(_))));
    }

    #[test]
    fn test_config_builder_policy_shortcut() {
        let config = CspConfigBuilder::new()
            .policy(policy(&[("default-src", "'self'")]), true)
            .with_nonce_length(24)
            .build()
            .unwrap();

        let resolved = config.resolve("/anything");
        assert!(resolved.nonce);
        assert!(resolved.policy.is_some());
        assert_eq!(config.nonce_generator().length(), 24);
    }

    #[test]
    fn test_config_builder_rejects_zero_nonce_length() {
        let result = CspConfigBuilder::new().with_nonce_length(0).build();

        assert!(matches!(result, Err(CspError::ConfigError(_))));
    }

    #[test]
    fn test_config_builder_rejects_invalid_prerender_header() {
        let result = CspConfigBuilder::new()
            .with_prerender_header("bad header")
            .build();

        assert!(matches!(result, Err(CspError::HeaderError(_))));
    }

    #[test]
    fn test_config_generates_nonces_and_counts_them() {
        let config = CspConfig::default();

        let first = config.generate_nonce().unwrap();
        let second = config.generate_nonce().unwrap();

        assert_ne!(first, second);
        assert_eq!(config.stats().nonce_generation_count(), 2);
    }

    #[test]
    fn test_update_rules_publishes_new_snapshot() {
        let config = CspConfig::new(RouteRules::global(RouteSecurity::new().with_nonce(false)));
        let before = config.rules();

        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let id = config.add_update_listener(move |rules| {
            counter.fetch_add(rules.len(), Ordering::SeqCst);
        });

        config.update_rules(|rules| {
            rules.push("/secure/**", RouteSecurity::new().with_nonce(true));
        });

        assert_eq!(before.len(), 1);
        assert_eq!(config.rules().len(), 2);
        assert!(config.resolve("/secure/area").nonce);
        assert!(!config.resolve("/open").nonce);
        assert_eq!(notified.load(Ordering::SeqCst), 2);
        assert_eq!(config.stats().rules_update_count(), 1);

        assert!(config.remove_update_listener(id));
        assert!(!config.remove_update_listener(id));
    }

    #[test]
    fn test_cloned_config_shares_rules() {
        let config = CspConfig::default();
        let clone = config.clone();

        config.replace_rules(RouteRules::global(RouteSecurity::new().with_nonce(true)));

        assert!(clone.resolve("/").nonce);
    }
}
