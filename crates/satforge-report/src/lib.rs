//! satforge-report — HTML fragment rendering and document output.
//!
//! `html` turns an assembled exam into semantic fragments; `writer` embeds
//! them into the page template and writes the final file. Rendering is a pure
//! function of (exam, answer key, mode); only the writer touches disk.

pub mod html;
pub mod writer;

pub use html::{render, Fragment, FragmentKind, RenderWarning, RenderedDocument};
pub use writer::write_html_document;
