pub mod aggregate;
pub mod builder;
pub mod clusters;
pub mod digest;
pub mod hierarchy;
pub mod merge;
pub mod node;
pub mod regroup;
