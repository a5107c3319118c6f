pub mod items;
pub mod level;
