use crate::cli::CheckArgs;
use crate::config::build_config;
use crate::error::Result;
use tracing::info;

pub async fn run(args: CheckArgs) -> Result<()> {
    let app_config = build_config(&args.tool, None, None)?;
    let context = app_config.context();

    let program = context.locate()?;
    info!("Found {} at {:?}", app_config.fold.tool_name, program);
    let version = context.tool_version().await?;

    println!("Tool:    {}", program.display());
    println!(
        "Version: {}",
        if version.is_empty() { "unknown" } else { &version }
    );
    println!("Command: {}", app_config.fold.command_line());
    println!("Timeout: {:.1}s", app_config.fold.timeout.as_secs_f64());
    Ok(())
}
