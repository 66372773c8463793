use bsp_format::{registry::index_for, LumpKind};
use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;

use super::MapArgs;

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    map: MapArgs,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let bsp = self.map.open()?;
        let map_type = bsp.map_type()?;

        println!("{}: {map_type}", "format".bold());
        println!("{}: {:?}", "endian".bold(), bsp.endian());

        let size = bsp.directory_size()?;
        println!("{}: {size} slots", "directory".bold());
        println!(
            "{:>5}  {:>10}  {:>10}  {:>7}  {}",
            "slot".dimmed(),
            "offset".dimmed(),
            "length".dimmed(),
            "version".dimmed(),
            "kinds".dimmed()
        );

        for index in 0..size {
            let info = bsp.directory_entry(index)?;
            let kinds = LumpKind::ALL
                .into_iter()
                .filter(|kind| index_for(*kind, map_type) == Some(index))
                .join(", ");

            let mut line = format!(
                "{index:>5}  {:>10}  {:>10}  {:>7}  {kinds}",
                info.offset, info.length, info.version
            );
            if let Some(lump_file) = &info.lump_file {
                line.push_str(&format!(" ({})", lump_file.display()));
            }

            match info.is_empty() {
                true => println!("{}", line.dimmed()),
                false => println!("{line}"),
            }
        }

        if let Some(game_lump) = bsp.game_lump()? {
            println!("{}: {} entries", "game lump".bold(), game_lump.len());
            for (id, info) in game_lump.iter() {
                println!(
                    "{:>5}  {:>10}  {:>10}  {:>7}",
                    id, info.offset, info.length, info.version
                );
            }
        }

        Ok(())
    }
}
