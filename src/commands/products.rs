use crate::args::FileArgs;
use crate::commands::{open_dashboard, OutputFormat, Out, Rows};
use crate::{Config, Result};

/// Lists the distinct, sorted product names of a file.
pub fn products(config: &Config, args: &FileArgs) -> Result<Out<Rows>> {
    let dashboard = open_dashboard(config, args.file())?;
    let names = dashboard.products();
    let rows: Vec<Vec<String>> = names.iter().map(|name| vec![name.to_string()]).collect();
    let rendered = Rows::render(OutputFormat::Table, &["product"], &rows)?;
    Ok(Out::new(format!("{} products", names.len()), rendered))
}
