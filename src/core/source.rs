use crate::constants::{
    NONCE_PLACEHOLDER, NONCE_PREFIX, NONE_SOURCE, SELF_SOURCE, STRICT_DYNAMIC_SOURCE,
    SUFFIX_QUOTE, UNSAFE_EVAL_SOURCE, UNSAFE_INLINE_SOURCE, WASM_UNSAFE_EVAL_SOURCE,
};
use std::{borrow::Cow, fmt};

/// A single CSP source expression.
///
/// Parsing a token and displaying the result always yields the original token, so a
/// `Source` can stand in for the raw string anywhere a token is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    StrictDynamic,
    WasmUnsafeEval,
    /// The `'nonce-{{nonce}}'` marker, resolved per response.
    NoncePlaceholder,
    Nonce(Cow<'static, str>),
    Scheme(Cow<'static, str>),
    Host(Cow<'static, str>),
    /// Any other quoted expression (hashes, `'report-sample'`, ...), kept verbatim.
    Keyword(Cow<'static, str>),
}

impl Source {
    pub fn parse(token: &str) -> Self {
        match token {
            NONE_SOURCE => Source::None,
            SELF_SOURCE => Source::Self_,
            UNSAFE_INLINE_SOURCE => Source::UnsafeInline,
            UNSAFE_EVAL_SOURCE => Source::UnsafeEval,
            STRICT_DYNAMIC_SOURCE => Source::StrictDynamic,
            WASM_UNSAFE_EVAL_SOURCE => Source::WasmUnsafeEval,
            NONCE_PLACEHOLDER => Source::NoncePlaceholder,
            _ => {
                if let Some(value) = token
                    .strip_prefix(NONCE_PREFIX)
                    .and_then(|rest| rest.strip_suffix(SUFFIX_QUOTE))
                {
                    return Source::Nonce(Cow::Owned(value.to_owned()));
                }
                if token.starts_with('\'') {
                    return Source::Keyword(Cow::Owned(token.to_owned()));
                }
                match token.strip_suffix(':') {
                    Some(scheme) if !scheme.is_empty() && !scheme.contains('/') => {
                        Source::Scheme(Cow::Owned(scheme.to_owned()))
                    }
                    _ => Source::Host(Cow::Owned(token.to_owned())),
                }
            }
        }
    }

    #[inline]
    pub fn is_placeholder_token(token: &str) -> bool {
        token == NONCE_PLACEHOLDER
    }

    #[inline(always)]
    pub const fn is_self(&self) -> bool {
        matches!(self, Source::Self_)
    }

    #[inline(always)]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Source::NoncePlaceholder)
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        matches!(self, Source::Nonce(_))
    }

    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        match self {
            Source::Nonce(nonce) => Some(nonce),
            _ => None,
        }
    }

    #[inline]
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Source::Scheme(scheme) => Some(scheme),
            _ => None,
        }
    }

    #[inline]
    pub fn host(&self) -> Option<&str> {
        match self {
            Source::Host(host) => Some(host),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            Source::StrictDynamic => Some(STRICT_DYNAMIC_SOURCE),
            Source::WasmUnsafeEval => Some(WASM_UNSAFE_EVAL_SOURCE),
            Source::NoncePlaceholder => Some(NONCE_PLACEHOLDER),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.as_static_str() {
            return f.write_str(keyword);
        }
        match self {
            Source::Nonce(nonce) => write!(f, "{}{}{}", NONCE_PREFIX, nonce, SUFFIX_QUOTE),
            Source::Scheme(scheme) => write!(f, "{}:", scheme),
            Source::Host(host) => f.write_str(host),
            Source::Keyword(keyword) => f.write_str(keyword),
            _ => Ok(()),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}
