use {clap::Parser, ledger_pricer::Cli, std::process::ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Debug)
    } else {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("ledger_pricer"), my_code_level)
        .parse_default_env() // RUST_LOG still wins
        .init();

    let args = Cli::parse();

    match ledger_pricer::run(args).await {
        Ok(summary) => {
            log::info!(
                "Done: {} rows written ({} priced)",
                summary.rows_written,
                summary.rows_enriched
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Run aborted: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
