//! Command implementations.

mod info;
mod render;
mod run;
mod set;
mod validate;

pub use info::run_info;
pub use render::run_render;
pub use run::run_overlay;
pub use set::run_set;
pub use validate::run_validate;
