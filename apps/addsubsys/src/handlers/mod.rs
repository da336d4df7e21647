pub mod list;
pub mod scaffold;
