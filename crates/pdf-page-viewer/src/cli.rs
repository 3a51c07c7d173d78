use crate::constants::DEFAULT_WINDOW_TITLE;
use crate::error::{Result, ViewerError};
use crate::payload::{DocumentPayload, PageNumber, ViewerArgs};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pdf-page-viewer", version, about = "Embedded single-page PDF viewer")]
pub struct Cli {
    /// Host arguments as JSON, `{"pdfBase64": ..., "initialPage": ...}`. Use `-` for stdin.
    #[arg(long, value_name = "FILE", conflicts_with = "pdf", required_unless_present = "pdf")]
    pub args: Option<PathBuf>,

    /// Local PDF file to view instead of host arguments.
    #[arg(long, value_name = "FILE")]
    pub pdf: Option<PathBuf>,

    /// Page to open on, overriding the host arguments.
    #[arg(long)]
    pub initial_page: Option<u32>,

    #[arg(long, default_value = DEFAULT_WINDOW_TITLE)]
    pub title: String,
}

impl Cli {
    pub fn viewer_args(&self) -> Result<ViewerArgs> {
        let mut args = match (&self.args, &self.pdf) {
            (Some(path), _) => read_args(path)?,
            (None, Some(pdf)) => ViewerArgs {
                pdf_base64: DocumentPayload::from_bytes(&std::fs::read(pdf)?)
                    .as_base64()
                    .to_string(),
                initial_page: PageNumber::FIRST,
            },
            (None, None) => {
                return Err(ViewerError::InvalidPayload(
                    "Either --args or --pdf is required".into(),
                ));
            }
        };

        if let Some(page) = self.initial_page {
            args.initial_page = PageNumber::new(i64::from(page))?;
        }

        Ok(args)
    }
}

fn read_args(path: &Path) -> Result<ViewerArgs> {
    let json = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };

    ViewerArgs::from_json(&json)
}
