pub mod digest;
pub mod zappi;
