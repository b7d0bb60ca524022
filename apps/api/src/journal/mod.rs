pub mod entries;
pub mod handlers;
