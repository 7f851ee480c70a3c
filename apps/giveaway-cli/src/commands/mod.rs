pub mod build;
pub mod generate_fixtures;
pub mod verify;
