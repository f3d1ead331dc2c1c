pub mod detail;
pub mod footer;
pub mod header;
pub mod history_table;
pub mod render;
pub mod text;
