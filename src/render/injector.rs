use crate::constants::{NONCE_ATTRIBUTE, NONCE_TAGS};
use crate::error::CspError;
use crate::render::document::DocumentSections;
use crate::render::fragment::{ElementMut, HtmlFragment};

/// Stamps `nonce="<value>"` on every `link`, `script` and `style` element.
#[derive(Debug, Clone, Copy)]
pub struct NonceInjector<'a> {
    nonce: &'a str,
}

impl<'a> NonceInjector<'a> {
    pub fn new(nonce: &'a str) -> Result<Self, CspError> {
        if nonce.is_empty() {
            return Err(CspError::InvalidNonceValue(
                "nonce must not be empty".to_string(),
            ));
        }
        Ok(Self { nonce })
    }

    #[inline]
    pub fn nonce(&self) -> &'a str {
        self.nonce
    }

    /// Returns the number of elements stamped.
    pub fn inject_fragment<F>(&self, fragment: &mut F) -> usize
    where
        F: HtmlFragment + ?Sized,
    {
        let mut stamped = 0;
        fragment.for_each_element(&NONCE_TAGS, &mut |element: &mut dyn ElementMut| {
            element.set_attribute(NONCE_ATTRIBUTE, self.nonce);
            stamped += 1;
        });
        stamped
    }

    /// Sweeps all four fragment groups. Returns the number of elements stamped.
    pub fn inject<F: HtmlFragment>(&self, document: &mut DocumentSections<F>) -> usize {
        document
            .fragments_mut()
            .map(|fragment| self.inject_fragment(fragment))
            .sum()
    }
}
