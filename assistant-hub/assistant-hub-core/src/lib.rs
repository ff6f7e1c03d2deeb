pub mod assistants;
pub mod chat;
pub mod error;
pub mod history;
pub mod knowledge;
pub mod names;
pub mod workspace;

pub use error::{Result, StoreError};
pub use workspace::Workspace;
