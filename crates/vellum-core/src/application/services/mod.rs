//! Application services - use case orchestration.

mod page_renderer;

pub use page_renderer::{PageLayout, PageRenderer};
