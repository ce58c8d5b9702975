//! Environment helpers shared by the diffevo binaries
//!
//! Generated artefacts (CSV records, HTML plots) go under
//! `$DIFFEVO_DIR/data_generated`.

pub mod constants;
pub mod env_utils;

pub use constants::{DATA_GENERATED, DIFFEVO_DIR, RECORDS};
pub use env_utils::{
    EnvError, get_data_generated_dir, get_diffevo_dir, get_records_dir, output_dir_or_default,
    records_dir_in,
};
