pub mod config;
pub mod directive;
pub mod header;
pub mod policy;
pub mod source;
pub mod synthesizer;

pub use config::{
    CspConfig, CspConfigBuilder, ResolvedSecurity, RouteRules, RouteSecurity, SecurityHeaders,
    Setting,
};
pub use directive::DirectiveValue;
pub use header::{CspHeaderSerializer, HeaderSerializer};
pub use policy::{CspPolicy, CspPolicyBuilder, NormalizedPolicy, TokenList};
pub use source::Source;
pub use synthesizer::{synthesize_policy, PolicySynthesizer};
