pub mod figures;
pub mod format;
pub mod page;
pub mod tables;

pub use page::{render_page, PageContent};
