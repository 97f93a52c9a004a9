pub mod entries;
pub mod gate;
pub mod rules;
pub mod screens;
pub mod state;
pub mod submit;
