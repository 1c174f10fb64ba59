mod escape;
mod page;
pub mod rich_text;

pub use escape::html_escape;
pub use page::{FormView, PageRenderer};
pub use rich_text::BlockRegistry;
