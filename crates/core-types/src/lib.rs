pub mod enums;
pub mod error;
pub mod form;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::ChartType;
pub use error::CoreError;
pub use form::EntryForm;
pub use structs::Record;
