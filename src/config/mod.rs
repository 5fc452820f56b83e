//! Configuration module

mod site;

pub use site::ContentPaths;
pub use site::SiteConfig;
