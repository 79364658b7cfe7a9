//! taskdeck-core: task entity, row codec, and the in-memory collection.

pub mod manager;
pub mod row;
pub mod task;

pub use manager::{TaskManager, TaskStats};
pub use row::{FIELD_COUNT, HEADER, RowError, decode_row, encode_row, split_row};
pub use task::{IdSequence, Task, UNTITLED};
