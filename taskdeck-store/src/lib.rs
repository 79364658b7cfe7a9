//! taskdeck-store: save-file storage and lenient bulk load/save.

pub mod file;
pub mod persist;

pub use file::{SaveFile, default_save_path};
pub use persist::{
    LoadReport, LoadSummary, backup, delete_save, load_tasks, parse_file, render_file, save_tasks,
};
