use clap::{Args, CommandFactory, Parser, Subcommand};
use csv_lens_common::Config;
use csv_lens_core::dataset::delimiter_byte;
use csv_lens_core::{
    export_csv, export_json, profile_file, to_json_string, write_report, DatasetReport, LoadOptions,
    ProfileOptions,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "csv-lens", version, about = "Describe the columns of a tabular file: unique values and counts")]
struct Cli {
    /// default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct LoadArgs {
    /// only profile these columns, in this order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
    #[arg(long)]
    delimiter: Option<char>,
    #[arg(long)]
    no_header: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a per-column summary
    Describe {
        path: PathBuf,
        #[arg(long)]
        max_values: Option<usize>,
        /// do not count missing values as a category
        #[arg(long = "no-na")]
        no_na: bool,
        /// text or json
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        sequential: bool,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Write the full profile to a JSON or CSV file
    Export {
        path: PathBuf,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long = "no-na")]
        no_na: bool,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;
    let effective_level = if quiet { "error" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));
    // stdout carries the report only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet);
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("ignoring config file: {e}");
            Config::default()
        }
    };
    match cli.command {
        Commands::Describe { path, max_values, no_na, format, output, sequential, load } => {
            let mut opts = profile_options(&config, no_na);
            if let Some(n) = max_values {
                opts.max_values = n;
            }
            if sequential {
                opts.parallel = false;
            }
            let format = format.unwrap_or_else(|| config.display.format.clone());
            run_describe(&path, &config, &load, &opts, &format, output.as_deref())?
        }
        Commands::Export { path, format, output, no_na, load } => {
            let opts = profile_options(&config, no_na);
            let format = format.unwrap_or_else(|| config.export.format.clone());
            run_export(&path, &config, &load, &opts, &format, output, &config.export.output_dir)?
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "csv-lens", &mut std::io::stdout());
        }
    }
    Ok(())
}

fn profile_options(config: &Config, no_na: bool) -> ProfileOptions {
    let mut opts = ProfileOptions::from_config(config);
    if no_na {
        opts.include_missing = false;
    }
    opts
}

fn load_options(config: &Config, args: &LoadArgs) -> anyhow::Result<LoadOptions> {
    let mut opts = LoadOptions::from_config(&config.loading)?;
    if let Some(d) = args.delimiter {
        opts.delimiter = Some(delimiter_byte(d)?);
    }
    if args.no_header {
        opts.has_header = false;
    }
    Ok(opts)
}

fn load_report(path: &Path, config: &Config, args: &LoadArgs, opts: &ProfileOptions) -> anyhow::Result<DatasetReport> {
    let load = load_options(config, args)?;
    debug!(path = %path.display(), ?opts, "profiling");
    Ok(profile_file(path, &load, opts, args.columns.as_deref())?)
}

fn run_describe(
    path: &Path,
    config: &Config,
    args: &LoadArgs,
    opts: &ProfileOptions,
    format: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    // validate before doing any work
    if !matches!(format, "text" | "json") {
        anyhow::bail!("Unknown format: {format} (use text or json)");
    }
    let report = load_report(path, config, args, opts)?;
    let mut sink: Box<dyn Write> = match output {
        Some(p) => Box::new(std::fs::File::create(p)?),
        None => Box::new(std::io::stdout().lock()),
    };
    if format == "json" {
        writeln!(sink, "{}", to_json_string(&report)?)?;
        sink.flush()?;
    } else {
        write_report(&mut sink, &report, opts.max_values)?;
    }
    Ok(())
}

fn run_export(
    path: &Path,
    config: &Config,
    args: &LoadArgs,
    opts: &ProfileOptions,
    format: &str,
    output: Option<PathBuf>,
    output_dir: &str,
) -> anyhow::Result<()> {
    if !matches!(format, "json" | "csv") {
        anyhow::bail!("Unknown format: {format} (use json or csv)");
    }
    let report = load_report(path, config, args, opts)?;
    let out_path = output.unwrap_or_else(|| Path::new(output_dir).join(format!("profile.{format}")));
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match format {
        "json" => export_json(&out_path, &report)?,
        _ => export_csv(&out_path, &report)?,
    }
    println!("Exported to {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = Config::default();
        cfg.display.max_values = 4;
        let opts = profile_options(&cfg, true);
        assert_eq!(opts.max_values, 4);
        assert!(!opts.include_missing);

        let args = LoadArgs {
            delimiter: Some(';'),
            no_header: true,
            ..LoadArgs::default()
        };
        let load = load_options(&cfg, &args).unwrap();
        assert_eq!(load.delimiter, Some(b';'));
        assert!(!load.has_header);
    }

    #[test]
    fn parses_describe_arguments() {
        let cli = Cli::try_parse_from([
            "csv-lens", "describe", "data.csv", "--max-values", "0", "--no-na", "--columns", "a,b",
        ])
        .unwrap();
        match cli.command {
            Commands::Describe { max_values, no_na, load, .. } => {
                assert_eq!(max_values, Some(0));
                assert!(no_na);
                assert_eq!(load.columns, Some(vec!["a".to_string(), "b".to_string()]));
            }
            _ => panic!("expected describe"),
        }
    }
}
