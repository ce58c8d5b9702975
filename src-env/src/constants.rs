/// Environment variable holding the project root
pub const DIFFEVO_DIR: &str = "DIFFEVO_DIR";

/// Output directory, relative to the project root
pub const DATA_GENERATED: &str = "data_generated";

/// Optimization records, relative to [`DATA_GENERATED`]
pub const RECORDS: &str = "records";
