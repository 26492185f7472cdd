pub mod csp;
pub mod extensions;

pub use csp::{configure_csp, csp_nonce_middleware, CspNonceMiddleware, CspNonceMiddlewareService};
pub use extensions::CspExtensions;
