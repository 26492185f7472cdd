use crate::core::source::Source;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Configured value of one CSP directive.
///
/// Configuration files write this as `false`, a space separated string, or an array of
/// tokens. Any boolean disables the directive for header synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    Disabled,
    RawString(String),
    TokenList(Vec<String>),
}

impl DirectiveValue {
    #[inline]
    pub fn raw(value: impl Into<String>) -> Self {
        DirectiveValue::RawString(value.into())
    }

    pub fn tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        DirectiveValue::TokenList(tokens.into_iter().map(Into::into).collect())
    }

    pub fn sources(sources: impl IntoIterator<Item = Source>) -> Self {
        DirectiveValue::TokenList(sources.into_iter().map(String::from).collect())
    }

    #[inline]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, DirectiveValue::Disabled)
    }

    /// Source tokens in configuration order, before nonce resolution.
    pub fn token_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            DirectiveValue::Disabled => Box::new(std::iter::empty()),
            DirectiveValue::RawString(raw) => Box::new(raw.split_whitespace()),
            DirectiveValue::TokenList(tokens) => Box::new(tokens.iter().map(String::as_str)),
        }
    }

    #[inline]
    pub fn uses_nonce_placeholder(&self) -> bool {
        self.token_iter().any(Source::is_placeholder_token)
    }
}

impl From<bool> for DirectiveValue {
    fn from(_: bool) -> Self {
        DirectiveValue::Disabled
    }
}

impl From<&str> for DirectiveValue {
    fn from(value: &str) -> Self {
        DirectiveValue::RawString(value.to_owned())
    }
}

impl From<String> for DirectiveValue {
    fn from(value: String) -> Self {
        DirectiveValue::RawString(value)
    }
}

impl From<Vec<String>> for DirectiveValue {
    fn from(tokens: Vec<String>) -> Self {
        DirectiveValue::TokenList(tokens)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectiveRepr {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for DirectiveValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match DirectiveRepr::deserialize(deserializer)? {
            DirectiveRepr::Flag(_) => DirectiveValue::Disabled,
            DirectiveRepr::Text(text) => DirectiveValue::RawString(text),
            DirectiveRepr::List(tokens) => DirectiveValue::TokenList(tokens),
        })
    }
}

impl Serialize for DirectiveValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DirectiveValue::Disabled => serializer.serialize_bool(false),
            DirectiveValue::RawString(raw) => serializer.serialize_str(raw),
            DirectiveValue::TokenList(tokens) => tokens.serialize(serializer),
        }
    }
}
