pub mod select;
pub mod text_input;

pub use select::SelectState;
pub use text_input::TextInputState;
