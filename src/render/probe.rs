use crate::constants::HEADER_PRERENDER;
use crate::error::CspError;
use actix_web::http::header::HeaderName;
use actix_web::HttpRequest;

/// Tells whether a request is a static-generation (prerender) pass.
pub trait PrerenderProbe: Send + Sync {
    fn is_prerendering(&self, req: &HttpRequest) -> bool;
}

/// Treats any request carrying the prerender header as a static-generation pass.
#[derive(Debug, Clone)]
pub struct HeaderPrerenderProbe {
    header: HeaderName,
}

impl HeaderPrerenderProbe {
    pub fn new(header: &str) -> Result<Self, CspError> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|err| CspError::HeaderError(format!("{}: {}", err, header)))?;
        Ok(Self { header })
    }

    #[inline]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for HeaderPrerenderProbe {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(HEADER_PRERENDER),
        }
    }
}

impl PrerenderProbe for HeaderPrerenderProbe {
    #[inline]
    fn is_prerendering(&self, req: &HttpRequest) -> bool {
        req.headers().contains_key(&self.header)
    }
}
