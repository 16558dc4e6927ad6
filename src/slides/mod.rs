pub mod color;
pub mod pptx;
pub mod table;
