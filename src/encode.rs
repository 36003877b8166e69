pub mod png;
pub mod sink;
