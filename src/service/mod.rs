pub mod actions;
pub mod api;
