pub mod common;
pub mod extension;
pub mod manifest;
pub mod options;
pub mod template;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use extension::{Extension, ExtensionRegistry};
pub use manifest::Manifest;
pub use options::ScaffoldOptions;
pub use template::{TemplateDescriptor, TemplateName, TemplateOrigin};
