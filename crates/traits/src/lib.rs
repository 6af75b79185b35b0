pub mod archive;
pub mod context;
pub mod storage;
pub mod text_input;

pub use archive::{ArchiveEntry, ArchiveError, Archiver, ArchiverLoader, JsonBundleArchiver};
pub use context::{ContextError, InMemoryContext, IsolatedContext, LoadRecord};
pub use storage::{InMemoryStorage, Storage, StorageError};
pub use text_input::{InMemoryTextInput, Selection, TextInput};
