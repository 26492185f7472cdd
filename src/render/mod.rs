pub mod context;
pub mod document;
pub mod fragment;
pub mod hook;
pub mod html;
pub mod injector;
pub mod probe;

pub use context::RenderContext;
pub use document::{DocumentSections, FragmentGroup};
pub use fragment::{ElementMut, HtmlFragment};
pub use hook::CspRenderHook;
pub use html::ParsedFragment;
pub use injector::NonceInjector;
pub use probe::{HeaderPrerenderProbe, PrerenderProbe};
