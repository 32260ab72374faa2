//! File locations and run-level constants

/// Default paths for the ledger files
pub struct LedgerFilesConfig {
    /// Where the enriched ledger is written unless `--to` is given
    pub output_path: &'static str,
    /// Default input for the fills layout
    pub fills_input_path: &'static str,
    /// Default input for the account history layout
    pub history_input_path: &'static str,
}

pub struct ProgressConfig {
    /// Log a progress line every this many rows
    pub every_rows: usize,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub ledger: LedgerFilesConfig,
    pub progress: ProgressConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    ledger: LedgerFilesConfig {
        output_path: "modified.csv",
        fills_input_path: "fills.csv",
        history_input_path: "history.csv",
    },
    progress: ProgressConfig { every_rows: 10 },
};
