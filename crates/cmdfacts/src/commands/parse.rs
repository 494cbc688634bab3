//! Parse command

use anyhow::{bail, Context, Result};
use cmdfacts_core::ExtensionConfig;
use cmdfacts_extensions::ExtensionContext;
use owo_colors::OwoColorize;

use crate::cli::ParseArgs;
use crate::output;

/// Run one extension and its prerequisites over a raw command batch
pub fn run(args: ParseArgs, conf: ExtensionConfig) -> Result<()> {
    if !args.cmds_file.is_file() {
        bail!("Command batch not found: {}", args.cmds_file);
    }

    let mut ctx = ExtensionContext::with_builtins(args.work_dir.clone().into_std_path_buf(), conf);
    let extension = ctx
        .init(&args.extension)
        .with_context(|| format!("Failed to set up extension '{}'", args.extension))?;

    if extension.base().is_parsed() {
        output::warn(&format!(
            "{} already completed in {}, existing artifacts are kept",
            args.extension, args.work_dir
        ));
    } else {
        output::info(&format!("Running {} over {}", args.extension, args.cmds_file));
    }

    extension
        .parse(args.cmds_file.as_std_path())
        .with_context(|| format!("Failed to run extension '{}'", args.extension))?;

    output::success(&format!("{} finished", args.extension));
    output::kv("Working directory", args.work_dir.as_str());

    println!("\n{}", "Extensions".bold());
    for name in ctx.initialised() {
        let Some(ext) = ctx.get(name) else { continue };
        match ext.base().completion_record() {
            Some(record) => println!("  {} {} {}", "✓".green(), name, record.completed_at.dimmed()),
            None => println!("  {} {}", "-".dimmed(), name),
        }
    }

    Ok(())
}
