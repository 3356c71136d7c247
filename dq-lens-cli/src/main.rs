use anyhow::Context;
use clap::{Parser, Subcommand};
use dq_lens_common::{Config, DqLensError, ErrorKind, ProfileConfig};
use dq_lens_core::{
    print_summary, profile_dataset, write_json, CompactContext, InsightContext, JsonLinesSink,
    ProfileSink,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dq-lens", version, about = "Column-level data quality profiler for CSV and Parquet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct Limits {
    /// rows read from the start of the file
    #[arg(long)]
    row_cap: Option<usize>,
    /// most frequent values kept per text column
    #[arg(long)]
    top_k: Option<usize>,
    /// leading CSV rows used for type inference
    #[arg(long)]
    infer_rows: Option<usize>,
}

impl Limits {
    fn apply(&self, mut cfg: ProfileConfig) -> ProfileConfig {
        if let Some(n) = self.row_cap {
            cfg = cfg.with_row_cap(n);
        }
        if let Some(k) = self.top_k {
            cfg = cfg.with_top_k(k);
        }
        if let Some(n) = self.infer_rows {
            cfg = cfg.with_infer_schema_rows(n);
        }
        cfg
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// print (or write) the JSON profile
    Profile {
        path: PathBuf,
        #[command(flatten)]
        limits: Limits,
        #[arg(long, conflicts_with = "save")]
        output: Option<PathBuf>,
        /// write to `<output_dir>/<name>.profile.json` from the config
        #[arg(long)]
        save: bool,
        #[arg(long)]
        compact: bool,
    },
    /// fixed-width per-column summary
    Summary {
        path: PathBuf,
        #[command(flatten)]
        limits: Limits,
    },
    /// append dataset/column/profile records as JSON lines
    Records {
        path: PathBuf,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        output: PathBuf,
    },
    /// per-column context text for an insight generator
    Context {
        path: PathBuf,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        compact: bool,
    },
    /// write the default config file (at $DQ_LENS_CONFIG if set)
    InitConfig {
        #[arg(long)]
        force: bool,
    },
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::UnsupportedFormat => 2,
        ErrorKind::ReadFailure => 3,
        ErrorKind::ComputationFailure => 4,
        ErrorKind::Config => 5,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries the profile, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default()
        .save_to(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Profile {
            path,
            limits,
            output,
            save,
            compact,
        } => {
            let profile = profile_dataset(&path, &limits.apply(config.profiling))
                .with_context(|| format!("profiling {}", path.display()))?;
            let pretty = config.export.pretty && !compact;
            let output = output.or_else(|| {
                save.then(|| config.export.default_output(&profile.dataset_name))
            });
            match output {
                Some(out) => {
                    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("creating {}", parent.display()))?;
                    }
                    write_json(&out, &profile, pretty)
                        .with_context(|| format!("writing {}", out.display()))?;
                    eprintln!("profile saved to {}", out.display());
                }
                None => println!("{}", profile.to_json(pretty)?),
            }
        }
        Commands::Summary { path, limits } => {
            let profile = profile_dataset(&path, &limits.apply(config.profiling))
                .with_context(|| format!("profiling {}", path.display()))?;
            print_summary(&profile);
        }
        Commands::Records {
            path,
            limits,
            output,
        } => {
            let profile = profile_dataset(&path, &limits.apply(config.profiling))
                .with_context(|| format!("profiling {}", path.display()))?;
            let mut sink = JsonLinesSink::new(output);
            sink.store(&profile)
                .with_context(|| format!("appending records to {}", sink.path().display()))?;
        }
        Commands::Context {
            path,
            limits,
            compact,
        } => {
            let profile = profile_dataset(&path, &limits.apply(config.profiling))
                .with_context(|| format!("profiling {}", path.display()))?;
            let ctx: Box<dyn InsightContext> = Box::new(CompactContext::new(!compact));
            print!("{}", ctx.render(&profile)?);
        }
        Commands::InitConfig { force } => {
            let path = Config::active_path();
            init_config(&path, force)?;
            eprintln!("config written to {}", path.display());
        }
    }
    Ok(())
}

/// exit status for a failed run; 1 when no library error is underneath
fn failure_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<DqLensError>()
        .map(|e| exit_code(e.kind()))
        .unwrap_or(1)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    // a broken config file must not block rewriting it
    let result = if matches!(cli.command, Commands::InitConfig { .. }) {
        run(cli, Config::default())
    } else {
        Config::load()
            .context("loading config")
            .and_then(|config| run(cli, config))
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("dq-lens: {e:#}");
            ExitCode::from(failure_code(&e))
        }
    }
}
