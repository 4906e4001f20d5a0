use std::path::PathBuf;

use rescribe::config::RescribeConfig;

pub type CmdResult<T> = rescribe::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file; `./rescribe.json` is used when absent.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub(crate) fn load_config(&self) -> rescribe::Result<RescribeConfig> {
        RescribeConfig::load(self.config.as_deref())
    }
}

pub mod list;
pub mod run;
pub mod show;

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (rescribe::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::List => dispatch!((), global, list),
        crate::Commands::Show(args) => dispatch!(args, global, show),
    }
}
