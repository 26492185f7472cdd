use crate::constants::{
    BASE_URI, CONNECT_SRC, DEFAULT_SRC, FONT_SRC, FORM_ACTION, FRAME_ANCESTORS, IMG_SRC,
    NONCE_PREFIX, OBJECT_SRC, SCRIPT_SRC, STYLE_SRC, SUFFIX_QUOTE,
};
use crate::core::directive::DirectiveValue;
use crate::core::source::Source;
use crate::error::CspError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub type TokenList = SmallVec<[String; 4]>;

/// Declarative policy as written in route configuration.
///
/// Directive order is the insertion order and is kept all the way to the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CspPolicy {
    directives: IndexMap<String, DirectiveValue>,
}

impl CspPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_directive(
        &mut self,
        name: impl Into<String>,
        value: impl Into<DirectiveValue>,
    ) -> &mut Self {
        self.directives.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn remove_directive(&mut self, name: &str) -> Option<DirectiveValue> {
        self.directives.shift_remove(name)
    }

    #[inline]
    pub fn get_directive(&self, name: &str) -> Option<&DirectiveValue> {
        self.directives.get(name)
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = (&str, &DirectiveValue)> {
        self.directives.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Overlays `other` on top of this policy. Keys already present keep their position.
    pub fn merge(&mut self, other: &CspPolicy) {
        for (name, value) in &other.directives {
            self.directives.insert(name.clone(), value.clone());
        }
    }

    #[inline]
    pub fn uses_nonce_placeholder(&self) -> bool {
        self.directives
            .values()
            .any(DirectiveValue::uses_nonce_placeholder)
    }

    pub fn validate(&self) -> Result<(), CspError> {
        for name in self.directives.keys() {
            let valid = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-');
            if !valid {
                return Err(CspError::InvalidDirectiveName(name.clone()));
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for CspPolicy
where
    K: Into<String>,
    V: Into<DirectiveValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            directives: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl From<&NormalizedPolicy> for CspPolicy {
    fn from(normalized: &NormalizedPolicy) -> Self {
        normalized
            .directives()
            .map(|(name, tokens)| (name, DirectiveValue::tokens(tokens.iter().cloned())))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CspPolicyBuilder {
    policy: CspPolicy,
}

impl CspPolicyBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            policy: CspPolicy::new(),
        }
    }

    #[inline]
    pub fn directive(mut self, name: impl Into<String>, value: impl Into<DirectiveValue>) -> Self {
        self.policy.set_directive(name, value);
        self
    }

    #[inline]
    pub fn disable(self, name: impl Into<String>) -> Self {
        self.directive(name, DirectiveValue::Disabled)
    }

    pub fn sources(self, name: impl Into<String>, sources: impl IntoIterator<Item = Source>) -> Self {
        self.directive(name, DirectiveValue::sources(sources))
    }

    pub fn default_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(DEFAULT_SRC, sources)
    }

    pub fn script_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(SCRIPT_SRC, sources)
    }

    pub fn style_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(STYLE_SRC, sources)
    }

    pub fn img_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(IMG_SRC, sources)
    }

    pub fn connect_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CONNECT_SRC, sources)
    }

    pub fn font_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(FONT_SRC, sources)
    }

    pub fn object_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(OBJECT_SRC, sources)
    }

    pub fn frame_ancestors(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(FRAME_ANCESTORS, sources)
    }

    pub fn base_uri(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(BASE_URI, sources)
    }

    pub fn form_action(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(FORM_ACTION, sources)
    }

    pub fn build(self) -> Result<CspPolicy, CspError> {
        self.policy.validate()?;
        Ok(self.policy)
    }

    #[inline]
    pub fn build_unchecked(self) -> CspPolicy {
        self.policy
    }
}

/// Policy ready for serialization: every directive is a flat list of concrete tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedPolicy {
    directives: IndexMap<String, TokenList>,
}

impl NormalizedPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            directives: IndexMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, tokens: TokenList) {
        self.directives.insert(name.into(), tokens);
    }

    #[inline]
    pub fn tokens(&self, name: &str) -> Option<&[String]> {
        self.directives.get(name).map(|tokens| tokens.as_slice())
    }

    #[inline]
    pub fn contains_directive(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Nonce values carried by `'nonce-...'` tokens, in header order.
    pub fn nonces(&self) -> impl Iterator<Item = &str> {
        self.directives.values().flatten().filter_map(|token| {
            token
                .strip_prefix(NONCE_PREFIX)
                .and_then(|rest| rest.strip_suffix(SUFFIX_QUOTE))
        })
    }

    pub(crate) fn estimated_size(&self) -> usize {
        self.directives
            .iter()
            .map(|(name, tokens)| name.len() + tokens.iter().map(|t| t.len() + 1).sum::<usize>() + 2)
            .sum()
    }
}
