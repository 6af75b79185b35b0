pub mod bundle;
pub mod diagnostic;
pub mod role;

pub use bundle::{ComposedDocument, SourceBundle};
pub use diagnostic::{DiagnosticEntry, DiagnosticKind};
pub use role::{DocumentRole, RoleInfo};
