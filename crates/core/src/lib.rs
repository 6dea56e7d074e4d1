pub mod document;
pub mod session;

pub use document::{Document, DocumentError};
pub use session::{Session, SessionUi, UnsavedChoice};
