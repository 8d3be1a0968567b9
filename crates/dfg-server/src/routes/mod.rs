pub mod modules;
pub mod selection;
