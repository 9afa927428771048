pub mod child;
pub mod process_group;
