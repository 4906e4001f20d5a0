use clap::Args;
use serde::Serialize;

use rescribe::transforms::{self, Catalog, TransformSpec};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ShowArgs {
    /// Transform name
    pub transform: String,
}

#[derive(Serialize)]
pub struct ShowOutput {
    pub source: &'static str,
    #[serde(flatten)]
    pub spec: TransformSpec,
}

pub fn run(args: ShowArgs, global: &GlobalArgs) -> CmdResult<ShowOutput> {
    let config = global.load_config()?;
    let catalog = Catalog::with_custom(&config.custom);
    let spec = catalog.get(&args.transform)?.clone();

    // Surface bad patterns in configured transforms before anyone runs them.
    transforms::compile(&spec)?;

    let source = if catalog.is_custom(&spec.name) {
        "config"
    } else {
        "builtin"
    };

    Ok((ShowOutput { source, spec }, 0))
}
