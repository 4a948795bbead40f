//! Rendering pipeline for the bridge: decode state, render markup,
//! compose the response document.
//!
//! The pipeline is pure. Rendering returns both the body markup and
//! the head metadata it produced as one value ([`Rendered`]), so no
//! request-scoped state outlives the call and identical state always
//! composes to an identical document.

pub mod error;
pub mod escape;
pub mod head;
pub mod renderer;
pub mod state;
pub mod template;

pub use error::{RenderError, Result};
pub use head::HeadContent;
pub use renderer::{OutlineRenderer, Rendered, Renderer};
pub use state::PageState;
pub use template::{DocumentTemplate, BODY_MARKER};
