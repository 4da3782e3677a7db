pub mod fetch;
pub mod quickstart;
