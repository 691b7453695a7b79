pub mod encode;
pub mod form;
pub mod validate;

pub use form::{ReportDraft, ReportForm, RowEntry};
pub use validate::ValidationError;
