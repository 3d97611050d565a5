//! Config file generators for existing projects (`init` flow).

pub mod docker;
pub mod env;
