pub mod modules;
pub mod run;
pub mod show_summary;

pub use modules::*;
pub use run::*;
pub use show_summary::*;
