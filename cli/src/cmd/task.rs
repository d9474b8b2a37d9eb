use std::path::PathBuf;

use ach_core::{action, print_success, TaskConfig};
use anyhow::{ensure, Context as _};

use super::{GlobalArgs, SubcmdResult};
use crate::{config::GlobalConfig, util};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub subcmd: TaskSubcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum TaskSubcommand {
    /// Initialize an empty directory as a task directory
    Init(InitArgs),

    /// Create `CONTEST/TASK` and initialize it
    Create(CreateArgs),
}

#[derive(Debug, clap::Args)]
pub struct InitArgs {
    #[arg(default_value = "./")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub task: TaskArgs,
}

#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    pub contest: String,

    pub task_name: String,

    /// Directory to create `CONTEST/TASK` in [default: current dir]
    #[arg(short = 'C', long)]
    pub base_dir: Option<PathBuf>,

    #[command(flatten)]
    pub task: TaskArgs,
}

#[derive(Debug, clap::Args)]
pub struct TaskArgs {
    /// Build command, e.g. "g++ -O2 -o main main.cpp". Empty string means no build
    #[arg(long, value_name = "COMMAND")]
    pub build: Option<String>,

    /// Run command, e.g. "./main"
    #[arg(long, value_name = "COMMAND")]
    pub run: Option<String>,

    /// Directory whose files are copied into the new task directory
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Do not copy the configured template
    #[arg(long, conflicts_with = "template")]
    pub no_template: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = GlobalConfig::from_file_and_args(global_args);

    match &args.subcmd {
        TaskSubcommand::Init(args) => {
            let (task_config, template) = resolve(&args.task, &cfg)?;
            let path = action::init_task(&args.dir, &task_config, template.as_deref())?;
            print_success!(
                "Successfully initialized task directory. (config: {})",
                path.to_string_lossy()
            );
        }
        TaskSubcommand::Create(args) => {
            let (task_config, template) = resolve(&args.task, &cfg)?;
            let base_dir = args.base_dir.clone().unwrap_or_else(util::current_dir);
            let dir = action::create_task(
                base_dir,
                &args.contest,
                &args.task_name,
                task_config,
                template.as_deref(),
            )?;
            print_success!("Successfully created task. (path: {})", dir.to_string_lossy());
        }
    }
    Ok(())
}

/// Flags take precedence over the `[task]` section of the config file.
fn resolve(args: &TaskArgs, cfg: &GlobalConfig) -> anyhow::Result<(TaskConfig, Option<PathBuf>)> {
    let build = match &args.build {
        Some(s) => util::split_command(s),
        None => cfg.task.build.clone(),
    };
    let run = match &args.run {
        Some(s) => util::split_command(s),
        None => cfg.task.run.clone(),
    };
    ensure!(
        !run.is_empty(),
        "No run command: pass --run or set `task.run` in {}",
        GlobalConfig::FILENAME
    );

    let template = if args.no_template {
        None
    } else {
        args.template
            .clone()
            .or_else(|| cfg.task.template_dir.clone())
            .map(util::expand_tilde)
    };
    if let Some(dir) = &template {
        let is_dir = dir
            .metadata()
            .map(|m| m.is_dir())
            .with_context(|| format!("Cannot access template dir '{}'", dir.display()))?;
        ensure!(is_dir, "Template '{}' is not a directory", dir.display());
    }

    Ok((TaskConfig::new(build, run), template))
}
