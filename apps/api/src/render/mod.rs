//! Resume rendering: the shared visibility filter and the three template layouts.
//!
//! Everything in here is pure and synchronous. Handlers call it directly on
//! every preview request; nothing is cached or persisted.

pub mod compose;
pub mod filter;
pub mod handlers;
pub mod layout;
pub mod templates;
pub mod visibility;

pub use filter::{render_view, FilteredView};
pub use layout::{layout, PresentationTree};

use crate::models::resume::{ResumeContent, TemplateId};

/// Filter then arrange in one call.
pub fn render(content: &ResumeContent, template_id: TemplateId) -> PresentationTree {
    layout(&render_view(content, template_id))
}
