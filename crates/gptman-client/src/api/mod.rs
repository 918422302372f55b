//! API endpoint implementations.

mod assistants;
mod files;
mod messages;
mod runs;
mod threads;

pub use assistants::AssistantsApi;
pub use files::FilesApi;
pub use messages::MessagesApi;
pub use runs::RunsApi;
pub use threads::ThreadsApi;
