/// Domain models
///
/// Plain documents shared by every storage backend. Unlike row-mapped types,
/// these carry no SQL; persistence lives behind the [`crate::store::Store`]
/// trait and each backend maps documents to its own representation.
pub mod note;
pub mod project;
pub mod task;
pub mod token;
pub mod user;

pub use note::Note;
pub use project::Project;
pub use task::{StatusChange, Task, TaskStatus};
pub use token::OneTimeToken;
pub use user::{User, UserProfile};
