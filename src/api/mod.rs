pub mod client;
pub mod jsonp;
pub mod models;

pub use client::ReportClient;
pub use models::{ActivityTree, ReferenceData, SubmitOutcome};
