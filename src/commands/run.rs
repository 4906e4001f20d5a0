use clap::Args;

use rescribe::driver::{self, RunMode};
use rescribe::transforms::{Catalog, RECOMMENDED_ORDER};
use rescribe::{Error, RunReport};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RunArgs {
    /// Transforms to apply, in order (default: "transforms" from rescribe.json)
    pub transforms: Vec<String>,

    /// Apply the built-ins in their recommended migration order
    #[arg(long, conflicts_with = "transforms")]
    pub recommended: bool,

    /// Directory holding the test files (overrides config)
    #[arg(long)]
    pub dir: Option<String>,

    /// File name suffix selecting test files (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Additional file name globs to skip
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RunArgs, global: &GlobalArgs) -> CmdResult<RunReport> {
    let mut config = global
        .load_config()?
        .with_overrides(args.dir, args.suffix)?;
    config.exclude.extend(args.exclude);

    let names = if args.recommended {
        RECOMMENDED_ORDER.iter().map(|s| s.to_string()).collect()
    } else if args.transforms.is_empty() {
        config.transforms.clone()
    } else {
        args.transforms
    };

    if names.is_empty() {
        return Err(Error::validation_missing_argument(vec!["transform".to_string()])
            .with_hint("Name transforms to run, or set \"transforms\" in rescribe.json"));
    }

    let transforms = Catalog::with_custom(&config.custom).compile(&names)?;

    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };

    let report = driver::run(&config, &transforms, mode)?;
    let exit_code = if report.has_errors() { 1 } else { 0 };

    Ok((report, exit_code))
}
