use bsp_format::{registry::index_for, LumpKind};
use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use tracing::warn;

use super::MapArgs;

#[derive(Args)]
pub struct LumpsArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Also list kinds the format does not store
    #[arg(short, long, default_value_t = false)]
    all: bool,
}

impl LumpsArgs {
    pub fn handle(&self) -> Result<()> {
        let bsp = self.map.open()?;
        let map_type = bsp.map_type()?;
        println!("{}: {map_type}", "format".bold());

        let mut failed = 0;
        for kind in LumpKind::ALL {
            let slot = index_for(kind, map_type);
            if slot.is_none() && !self.all {
                continue;
            }

            let name = format!("{:<22}", kind.to_string());
            let slot = slot.map_or_else(|| "-".to_string(), |s| s.to_string());
            match bsp.count(kind) {
                Ok(Some(count)) => println!("{name} {slot:>4}  {count}"),
                Ok(None) => println!("{}", format!("{name} {slot:>4}  absent").dimmed()),
                Err(err) => {
                    failed += 1;
                    warn!(%kind, "{err}");
                    println!("{name} {slot:>4}  {}", err.root().red());
                }
            }
        }

        match failed {
            0 => Ok(()),
            n => Err(miette::miette!("{n} lumps could not be decoded")),
        }
    }
}
