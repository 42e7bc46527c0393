pub mod id;
pub mod value;
