pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod render;
pub mod security;

// Re-export commonly used types for convenience
pub use crate::constants::{CSP_SECTION, NONCE_ATTRIBUTE, NONCE_PLACEHOLDER, NONCE_TAGS};
pub use crate::core::{
    synthesize_policy, CspConfig, CspConfigBuilder, CspHeaderSerializer, CspPolicy,
    CspPolicyBuilder, DirectiveValue, HeaderSerializer, NormalizedPolicy, PolicySynthesizer,
    ResolvedSecurity, RouteRules, RouteSecurity, Source,
};
pub use crate::error::CspError;
pub use crate::middleware::{configure_csp, csp_nonce_middleware, CspExtensions, CspNonceMiddleware};
pub use crate::monitoring::{CspStats, PerformanceTimer};
pub use crate::render::{
    CspRenderHook, DocumentSections, ElementMut, FragmentGroup, HeaderPrerenderProbe,
    HtmlFragment, NonceInjector, ParsedFragment, PrerenderProbe, RenderContext,
};
pub use crate::security::{NonceGenerator, RequestNonce};
