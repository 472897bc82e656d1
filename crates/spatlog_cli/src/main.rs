//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a core session from `SPATLOG_*` configuration (or a db path
//!   argument) and print a deterministic summary.
//! - Verify `spatlog_core` linkage without any UI runtime.

use spatlog_core::{CoreConfig, CoreContext, StorageLocation};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut config = CoreConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config.storage = StorageLocation::Sqlite(PathBuf::from(path));
    }

    if let Err(err) = config.init_logging() {
        eprintln!("spatlog logging disabled: {err}");
    }

    println!("spatlog_core ping={}", spatlog_core::ping());
    println!("spatlog_core version={}", spatlog_core::core_version());

    let context = match CoreContext::open(&config) {
        Ok(context) => context,
        Err(err) => {
            log::error!("event=cli_open module=cli status=error error={err}");
            eprintln!("spatlog: {err}");
            return ExitCode::FAILURE;
        }
    };

    let arguments = context.arguments();
    println!(
        "arguments={} resolution_rate={:.1}",
        arguments.arguments().len(),
        arguments.resolution_rate()
    );
    for stat in arguments.category_stats() {
        println!("category {}={}", stat.category_id, stat.count);
    }

    let tally = context.rewards().tally();
    println!(
        "rewards={} awarded_rewards={} awarded_punishments={}",
        context.rewards().rewards().len(),
        tally.rewards,
        tally.punishments
    );

    ExitCode::SUCCESS
}
