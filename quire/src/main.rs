use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use quire::{
  cli::{Cli, Commands},
  commands,
  posts::BuildMode,
};
use quire_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    // Check if file already exists and that we're not forcing overwrite
    if output.exists() && !force {
      bail!(
        "Configuration file already exists: {}. Use --force to overwrite.",
        output.display()
      );
    }

    if let Some(parent) = output.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }

    Config::generate_default_config(format, output).wrap_err_with(|| {
      format!("Failed to generate configuration file: {}", output.display())
    })?;
    return Ok(());
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  let output = match &cli.command {
    Commands::Stats { files, json } => commands::stats(&config, files, *json)?,
    Commands::Render { file, output } => {
      let html = commands::render(&config, file)?;
      if let Some(output) = output {
        fs::write(output, html)
          .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
        info!("Rendered {} to {}", file.display(), output.display());
        return Ok(());
      }
      html
    },
    Commands::Outline { file, json } => {
      commands::outline(&config, file, *json)?
    },
    Commands::Sidebar { path, hash, json } => {
      commands::sidebar(&config, path, hash, *json)?
    },
    Commands::Posts {
      files,
      production,
      json,
    } => {
      let mode = if *production {
        BuildMode::Production
      } else {
        BuildMode::Development
      };
      commands::posts(&config, files, mode, *json)?
    },
    Commands::Init { .. } => return Ok(()),
  };

  print_output(&output);
  Ok(())
}

#[allow(clippy::print_stdout, reason = "Command output goes to stdout")]
fn print_output(output: &str) {
  if output.ends_with('\n') {
    print!("{output}");
  } else {
    println!("{output}");
  }
}
