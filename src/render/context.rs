use crate::render::document::DocumentSections;

/// Per-response state handed to the render hook.
///
/// The nonce travels with the document so that the injector and the synthesizer of the
/// same response always see the same value.
#[derive(Debug, Clone)]
pub struct RenderContext<F> {
    nonce: Option<String>,
    document: DocumentSections<F>,
}

impl<F> RenderContext<F> {
    #[inline]
    pub fn new(document: DocumentSections<F>) -> Self {
        Self {
            nonce: None,
            document,
        }
    }

    #[inline]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[inline]
    pub fn set_nonce(&mut self, nonce: Option<String>) {
        self.nonce = nonce;
    }

    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    #[inline]
    pub fn document(&self) -> &DocumentSections<F> {
        &self.document
    }

    #[inline]
    pub fn document_mut(&mut self) -> &mut DocumentSections<F> {
        &mut self.document
    }

    #[inline]
    pub fn into_document(self) -> DocumentSections<F> {
        self.document
    }
}

impl<F> Default for RenderContext<F> {
    fn default() -> Self {
        Self::new(DocumentSections::new())
    }
}
