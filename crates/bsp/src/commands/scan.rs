use std::path::{Path, PathBuf};

use bsp_format::{BspReader, MapReader, MapType};
use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct ScanArgs {
    /// A directory to search for maps
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only print the totals per format
    #[arg(short, long, default_value_t = false)]
    summary: bool,
}

fn is_map(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bsp"))
}

fn identify(path: &Path) -> bsp_format::Result<MapType> {
    BspReader::open(path)?.map_type()
}

impl ScanArgs {
    pub fn handle(&self) -> Result<()> {
        let mut found = Vec::new();

        for entry in WalkDir::new(&self.directory).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("{err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_map(entry.path()) {
                continue;
            }

            match identify(entry.path()) {
                Ok(map_type) => {
                    debug!(path = %entry.path().display(), %map_type, "identified");
                    if !self.summary {
                        println!("{:<16} {}", map_type.to_string(), entry.path().display());
                    }
                    found.push(Some(map_type));
                }
                Err(err) => {
                    if !self.summary {
                        println!("{:<16} {}", "unknown".red().to_string(), entry.path().display());
                    }
                    debug!(path = %entry.path().display(), "{err}");
                    found.push(None);
                }
            }
        }

        let totals = found
            .into_iter()
            .counts()
            .into_iter()
            .sorted_by(|(a, x), (b, y)| {
                y.cmp(x)
                    .then_with(|| a.map(MapType::id).cmp(&b.map(MapType::id)))
            })
            .map(|(map_type, count)| {
                let name = map_type.map_or_else(|| "unknown".to_string(), |m| m.to_string());
                format!("{name}: {count}")
            })
            .join(", ");

        println!("{}", totals.bold());
        Ok(())
    }
}
