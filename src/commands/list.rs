use serde::Serialize;

use rescribe::transforms::{Catalog, RECOMMENDED_ORDER};

use super::{CmdResult, GlobalArgs};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformSummary {
    pub name: String,
    pub description: String,
    pub passes: usize,
    pub source: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutput {
    pub transforms: Vec<TransformSummary>,
    pub defaults: Vec<String>,
    pub recommended_order: Vec<&'static str>,
}

pub fn run(_args: (), global: &GlobalArgs) -> CmdResult<ListOutput> {
    let config = global.load_config()?;
    let catalog = Catalog::with_custom(&config.custom);

    let transforms = catalog
        .specs()
        .iter()
        .map(|spec| TransformSummary {
            name: spec.name.clone(),
            description: spec.description.clone(),
            passes: spec.passes.len(),
            source: if catalog.is_custom(&spec.name) {
                "config"
            } else {
                "builtin"
            },
        })
        .collect();

    Ok((
        ListOutput {
            transforms,
            defaults: config.transforms,
            recommended_order: RECOMMENDED_ORDER.to_vec(),
        },
        0,
    ))
}
