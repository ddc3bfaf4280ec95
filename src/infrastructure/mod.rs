pub mod database;
pub mod locks;
pub mod offline;
pub mod plugins;
