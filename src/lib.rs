pub mod attribute;
pub mod config;
pub mod counties;
pub mod output;
pub mod scoring;
pub mod source;
pub mod store;
pub mod summary;
pub mod tract;
