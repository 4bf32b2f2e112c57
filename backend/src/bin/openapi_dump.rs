//! Print the vidhub OpenAPI document.
//!
//! Emits JSON by default; pass `--yaml` for YAML.

use color_eyre::eyre::Result;
use utoipa::OpenApi;
use vidhub::ApiDoc;

fn main() -> Result<()> {
    color_eyre::install()?;
    let doc = ApiDoc::openapi();
    let rendered = if std::env::args().any(|arg| arg == "--yaml") {
        doc.to_yaml()?
    } else {
        doc.to_pretty_json()?
    };
    println!("{rendered}");
    Ok(())
}
