pub mod args;
pub mod run;

pub use args::{Args, Command};
pub use run::run;
