//! Markup collaborators: descriptor documents and hypertext pages.

pub mod descriptor;
pub mod hyperlink;

pub use descriptor::{DescriptorError, ProjectDescriptor, parse_descriptor};
pub use hyperlink::{Hyperlink, parse_hyperlinks};
