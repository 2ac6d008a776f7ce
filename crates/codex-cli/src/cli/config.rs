//! `cdx config`: show the effective configuration.

use anyhow::Result;

use super::CommandContext;

pub fn run(ctx: &CommandContext) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&ctx.loaded.config)?);
        return Ok(());
    }

    let source = match &ctx.loaded.source {
        Some(path) => path.display().to_string(),
        None => "built-in defaults".to_string(),
    };
    println!("# source: {source}");
    print!("{}", toml::to_string_pretty(&ctx.loaded.config)?);
    Ok(())
}
