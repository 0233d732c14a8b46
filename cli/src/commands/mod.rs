pub mod allowances;
pub mod deploy;
pub mod locate;
pub mod predict;
pub mod status;
