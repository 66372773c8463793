use std::path::PathBuf;

use bsp_format::{Bsp, BspOptions, BspReader, MapType};
use clap::Args;
use miette::{Context, Result};

pub mod entities;
pub mod extract;
pub mod info;
pub mod lumps;
pub mod scan;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Show the format and lump directory of a map
    Info(info::InfoArgs),
    /// Count the elements of every lump a map's format defines
    Lumps(lumps::LumpsArgs),
    /// Write the raw bytes of one directory slot to a file
    Extract(extract::ExtractArgs),
    /// Print the entities of a map as JSON
    Entities(entities::EntitiesArgs),
    /// Report the format of every map below a directory
    Scan(scan::ScanArgs),
}

impl Commands {
    pub fn handle(&self) -> Result<()> {
        match self {
            Commands::Info(info) => info.handle(),
            Commands::Lumps(lumps) => lumps.handle(),
            Commands::Extract(extract) => extract.handle(),
            Commands::Entities(entities) => entities.handle(),
            Commands::Scan(scan) => scan.handle(),
        }
    }
}

/// Arguments shared by every command reading a single map
#[derive(Args)]
pub struct MapArgs {
    /// An input BSP file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Decode with this layout instead of the one named by the header
    #[arg(short, long, value_name = "FORMAT", value_parser = parse_map_type)]
    map_type: Option<MapType>,

    /// Fail on lumps that are not a whole number of records
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl MapArgs {
    pub fn open(&self) -> Result<Bsp<BspReader<std::io::BufReader<std::fs::File>>>> {
        let reader = BspReader::open(&self.file)
            .context(format!("path: {}", self.file.display()))?;

        let options = BspOptions::builder()
            .strict_records(self.strict)
            .strict_game_lumps(self.strict)
            .maybe_map_type(self.map_type)
            .build();

        Ok(Bsp::with_options(reader, options))
    }
}

/// Accept a layout by name, ignoring case, or by its numeric identity
fn parse_map_type(value: &str) -> std::result::Result<MapType, String> {
    if let Ok(id) = value.parse::<u32>() {
        return MapType::from_id(id).ok_or_else(|| format!("no format has the identity {id}"));
    }

    MapType::ALL
        .into_iter()
        .find(|m| m.to_string().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("unknown format {value}"))
}
