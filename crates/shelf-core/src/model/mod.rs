//! Work entity and the caller-facing shapes used to create and patch it.

pub mod id;
pub mod work;

pub use id::{WORK_ID_PREFIX, WorkId};
pub use work::{NewWork, Progress, Work, WorkPatch, WorkStatus, WorkType};
