pub mod actor;
pub mod health;
pub mod level;
pub mod sensor;
pub mod tilemap;
