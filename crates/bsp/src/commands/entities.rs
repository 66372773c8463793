use bsp_format::records::Entity;
use clap::Args;
use miette::{miette, IntoDiagnostic, Result};

use super::MapArgs;

#[derive(Args)]
pub struct EntitiesArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Only print entities of this class
    #[arg(short, long)]
    class: Option<String>,

    /// Indent the output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

impl EntitiesArgs {
    pub fn handle(&self) -> Result<()> {
        let bsp = self.map.open()?;
        let map_type = bsp.map_type()?;
        let entities = bsp
            .entities()?
            .ok_or_else(|| miette!("{map_type} maps have no entity lump"))?;

        let selected = entities
            .iter()
            .filter(|e| {
                self.class
                    .as_deref()
                    .map_or(true, |class| e.class_name() == Some(class))
            })
            .collect::<Vec<&Entity>>();

        let stdout = std::io::stdout().lock();
        match self.pretty {
            true => serde_json::to_writer_pretty(stdout, &selected),
            false => serde_json::to_writer(stdout, &selected),
        }
        .into_diagnostic()?;
        println!();

        Ok(())
    }
}
