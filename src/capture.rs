pub mod device;
pub mod machine;
pub mod slots;
