//! Editor and account reducers.

mod account;
mod editor;

pub use account::AccountReducer;
pub use editor::{EditorReducer, SLUG_CHECK_EFFECT};
