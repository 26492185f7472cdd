use crate::constants::{NONCE_PREFIX, SUFFIX_QUOTE};
use crate::core::directive::DirectiveValue;
use crate::core::policy::{CspPolicy, NormalizedPolicy, TokenList};
use crate::core::source::Source;
use std::borrow::Cow;

/// Turns a declarative [`CspPolicy`] into a [`NormalizedPolicy`] for one response.
///
/// Disabled directives are left out, string values are split into tokens and the
/// `'nonce-{{nonce}}'` placeholder becomes `'nonce-<value>'`. Without a nonce the
/// placeholder is dropped and every other token is kept as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicySynthesizer<'a> {
    nonce: Option<&'a str>,
}

impl<'a> PolicySynthesizer<'a> {
    #[inline]
    pub fn new(nonce: Option<&'a str>) -> Self {
        Self {
            nonce: nonce.filter(|nonce| !nonce.is_empty()),
        }
    }

    #[inline]
    pub fn nonce(&self) -> Option<&'a str> {
        self.nonce
    }

    pub fn synthesize(&self, policy: &CspPolicy) -> NormalizedPolicy {
        let mut normalized = NormalizedPolicy::with_capacity(policy.len());

        for (name, value) in policy.directives() {
            if let Some(tokens) = self.normalize_directive(value) {
                normalized.insert(name, tokens);
            }
        }

        normalized
    }

    /// `None` means the directive is disabled and must not be emitted.
    pub fn normalize_directive(&self, value: &DirectiveValue) -> Option<TokenList> {
        if value.is_disabled() {
            return None;
        }

        Some(
            value
                .token_iter()
                .filter_map(|token| self.resolve_token(token))
                .map(Cow::into_owned)
                .collect(),
        )
    }

    #[inline]
    pub fn resolve_token<'t>(&self, token: &'t str) -> Option<Cow<'t, str>> {
        if !Source::is_placeholder_token(token) {
            return Some(Cow::Borrowed(token));
        }

        self.nonce
            .map(|nonce| Cow::Owned(format!("{}{}{}", NONCE_PREFIX, nonce, SUFFIX_QUOTE)))
    }
}

#[inline]
pub fn synthesize_policy(policy: &CspPolicy, nonce: Option<&str>) -> NormalizedPolicy {
    PolicySynthesizer::new(nonce).synthesize(policy)
}
