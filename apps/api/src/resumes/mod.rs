//! Resume documents: ownership-scoped storage, debounced autosave and photo upload.

pub mod autosave;
pub mod handlers;
pub mod photo;
pub mod repository;
