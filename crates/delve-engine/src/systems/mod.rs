pub mod behavior;
pub mod crawler;
pub mod flyer;
pub mod player;
pub mod sensors;
