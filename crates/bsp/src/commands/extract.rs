use std::{fs::File, io::Write, path::PathBuf};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;

use super::MapArgs;

#[derive(Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    map: MapArgs,

    /// The directory slot to extract
    #[arg(short, long)]
    index: usize,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let bsp = self.map.open()?;
        let data = bsp
            .raw_lump(self.index)
            .context(format!("reading slot {}", self.index))?;

        info!("writing {} bytes to {}", data.len(), self.output.display());

        let mut out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", self.output.display()))?
        };

        out.write_all(&data).into_diagnostic()?;
        Ok(())
    }
}
