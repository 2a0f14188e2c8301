//! Blank export template: two decorative rows followed by the alias header.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::TemplateArgs, columns::CanonicalField, io_utils};

pub fn template_rows() -> [Vec<&'static str>; 3] {
    [
        CanonicalField::ALL.iter().map(|field| field.name()).collect(),
        CanonicalField::ALL.iter().map(|_| "required").collect(),
        CanonicalField::ALL.iter().map(|field| field.alias()).collect(),
    ]
}

pub fn execute(args: &TemplateArgs) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(&args.output)?;
    for row in template_rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing template row to {:?}", args.output))?;
    }
    writer.flush()?;
    info!("Template written to {:?}", args.output);
    Ok(())
}
