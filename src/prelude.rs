pub use crate::core::{
    CspConfig, CspConfigBuilder, CspPolicy, CspPolicyBuilder, DirectiveValue, RouteRules,
    RouteSecurity, Source,
};
pub use crate::middleware::{configure_csp, csp_nonce_middleware, CspExtensions, CspNonceMiddleware};
pub use crate::monitoring::CspStats;
pub use crate::render::{DocumentSections, FragmentGroup, ParsedFragment, RenderContext};
pub use crate::security::{NonceGenerator, RequestNonce};
