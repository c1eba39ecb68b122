pub mod catalog_service;
pub mod folder_validator;
pub mod name_parser;
pub mod report_writer;

pub use catalog_service::{ApplyMode, CatalogService, LoadOutcome};
pub use folder_validator::FolderValidator;
pub use name_parser::NameParser;
pub use report_writer::ReportWriter;
