use std::{path::PathBuf, time::Duration};

use ach_core::{
    action::{self, ExecOptions},
    testing::CompareMode,
};

use super::{GlobalArgs, SubcmdResult};
use crate::{config::GlobalConfig, util};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Task directory [default: current dir]
    #[arg(short = 'C', long)]
    pub dir: Option<PathBuf>,

    /// Kill a run after this many milliseconds (0 = no limit)
    #[arg(long, value_name = "MS")]
    pub time_limit: Option<u64>,

    /// Compare outputs byte-for-byte instead of ignoring trailing whitespace
    #[arg(long)]
    pub exact: bool,

    #[arg(long)]
    pub no_color: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_args(global_args);
    let dir = args.dir.clone().unwrap_or_else(util::current_dir);

    let opts = exec_options(args, &cfg);
    let results = action::do_test(&dir, &opts).await?;
    log::debug!("{} testcases executed", results.len());
    Ok(())
}

fn exec_options(args: &Args, cfg: &GlobalConfig) -> ExecOptions {
    let time_limit = args
        .time_limit
        .or(cfg.exec.time_limit_ms)
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis);
    let compare_mode = if args.exact {
        CompareMode::Exact
    } else {
        cfg.exec.compare
    };
    ExecOptions {
        time_limit,
        compare_mode,
        color: !args.no_color && std::env::var_os("NO_COLOR").is_none(),
    }
}
