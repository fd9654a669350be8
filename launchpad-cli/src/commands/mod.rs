pub mod addons;
pub mod env;
pub mod install;
pub mod options;
