use crate::constants::{CSP_SECTION, HEADER_CSP};
use crate::core::config::{CspConfig, ResolvedSecurity};
use crate::core::header::HeaderSerializer;
use crate::core::synthesizer::PolicySynthesizer;
use crate::monitoring::perf::PerformanceTimer;
use crate::monitoring::stats::CspStats;
use crate::render::context::RenderContext;
use crate::render::fragment::HtmlFragment;
use crate::render::injector::NonceInjector;
use actix_web::http::header::{HeaderName, HeaderValue};
use std::sync::Arc;

/// Runs once per rendered HTML response: stamps the nonce into the document and builds
/// the `Content-Security-Policy` header value.
#[derive(Clone)]
pub struct CspRenderHook {
    serializer: Arc<dyn HeaderSerializer>,
    stats: Arc<CspStats>,
}

impl CspRenderHook {
    #[inline]
    pub fn new(serializer: Arc<dyn HeaderSerializer>, stats: Arc<CspStats>) -> Self {
        Self { serializer, stats }
    }

    #[inline]
    pub fn from_config(config: &CspConfig) -> Self {
        Self::new(config.serializer().clone(), config.stats().clone())
    }

    #[inline]
    pub fn header_name() -> HeaderName {
        HeaderName::from_static(HEADER_CSP)
    }

    /// Returns the header value to set, or `None` when the response must be left alone.
    ///
    /// The document is only touched when the route enables nonces and the context
    /// carries one. Failures never propagate: the header is skipped instead.
    pub fn on_render_html<F: HtmlFragment>(
        &self,
        ctx: &mut RenderContext<F>,
        security: &ResolvedSecurity,
        prerendering: bool,
    ) -> Option<HeaderValue> {
        if prerendering {
            self.stats.increment_prerender_skip_count();
            log::trace!("Skipping CSP header during prerendering");
            return None;
        }

        let policy = match &security.policy {
            Some(policy) => policy,
            None => {
                self.stats.increment_missing_policy_skip_count();
                log::trace!("No CSP configured for route, skipping header");
                return None;
            }
        };

        let nonce = if security.nonce {
            ctx.nonce().map(str::to_owned)
        } else {
            None
        };

        if security.nonce {
            match nonce.as_deref().map(NonceInjector::new) {
                Some(Ok(injector)) => {
                    let stamped = injector.inject(ctx.document_mut());
                    self.stats.add_injected_elements(stamped);
                    log::debug!("Stamped nonce on {} elements", stamped);
                }
                Some(Err(err)) => log::warn!("Nonce injection skipped: {}", err),
                None => log::warn!("Nonce enabled for route but no nonce in render context"),
            }
        }

        let timer = PerformanceTimer::new();
        let normalized = PolicySynthesizer::new(nonce.as_deref()).synthesize(policy);

        match self.serializer.header_value(CSP_SECTION, &normalized) {
            Ok(value) => {
                self.stats.increment_header_count();
                self.stats.add_header_generation_time(timer.elapsed_ns());
                log::debug!("Content-Security-Policy: {:?}", value);
                Some(value)
            }
            Err(err) => {
                self.stats.increment_serialize_error_count();
                log::error!("Failed to serialize Content-Security-Policy: {}", err);
                None
            }
        }
    }
}
