pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_PRERENDER: &str = "x-nitro-prerender";

pub const CSP_SECTION: &str = "contentSecurityPolicy";
pub const NONCE_PLACEHOLDER: &str = "'nonce-{{nonce}}'";
pub const NONCE_ATTRIBUTE: &str = "nonce";
pub const NONCE_TAGS: [&str; 3] = ["link", "script", "style"];

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const FRAME_ANCESTORS: &str = "frame-ancestors";
pub(crate) const BASE_URI: &str = "base-uri";
pub(crate) const FORM_ACTION: &str = "form-action";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub(crate) const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";
pub(crate) const WASM_UNSAFE_EVAL_SOURCE: &str = "'wasm-unsafe-eval'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";

pub(crate) const DEFAULT_NONCE_LENGTH: usize = 16;
pub(crate) const SEMICOLON_SPACE: &str = "; ";
pub(crate) const CATCH_ALL_SUFFIX: &str = "/**";
