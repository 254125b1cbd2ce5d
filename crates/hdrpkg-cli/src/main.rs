mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::install::InstallArgs;
use commands::{exit_code_for, load_descriptor};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "hdrpkg",
    version,
    about = "Deterministic packaging descriptor for header-only C++ libraries"
)]
struct Cli {
    /// Path to the recipe file (defaults to ./hdrpkg.toml, then the built-in preset).
    #[arg(long, global = true, conflicts_with = "preset")]
    recipe: Option<PathBuf>,

    /// Use a built-in recipe preset instead of a recipe file.
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the package identity.
    Identity,
    /// List the files exported with the package sources.
    Exports {
        /// Source tree root.
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Compute the package fingerprint for a set of build settings.
    Fingerprint {
        /// Profile file with a [settings] table.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Setting override, e.g. -s compiler=gcc (repeatable).
        #[arg(short = 's', long = "setting")]
        settings: Vec<String>,
    },
    /// Copy the exported sources into a directory (source distribution).
    Export {
        /// Source tree root.
        root: PathBuf,
        /// Destination directory.
        dest: PathBuf,
    },
    /// Configure, build, and install the package through the build driver.
    Install {
        /// Source tree root.
        root: PathBuf,
        /// Install prefix.
        prefix: PathBuf,
        /// Keep staged sources and the build tree in this directory.
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Profile file with a [settings] table.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Setting override, e.g. -s build_type=Debug (repeatable).
        #[arg(short = 's', long = "setting")]
        settings: Vec<String>,
    },
    /// Write an hdrpkg.toml seeded from a built-in preset.
    Init {
        /// Directory to write the recipe into.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing recipe.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// List built-in recipe presets.
    Presets,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("HDRPKG_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = cli.json;
    let recipe = cli.recipe.as_deref();
    let preset = cli.preset.as_deref();
    let result = match cli.command {
        Commands::Identity => {
            load_descriptor(recipe, preset).and_then(|d| commands::identity::run(&d, json))
        }
        Commands::Exports { root } => {
            load_descriptor(recipe, preset).and_then(|d| commands::exports::run(&d, &root, json))
        }
        Commands::Fingerprint { profile, settings } => load_descriptor(recipe, preset)
            .and_then(|d| commands::fingerprint::run(&d, profile.as_deref(), &settings, json)),
        Commands::Export { root, dest } => load_descriptor(recipe, preset)
            .and_then(|d| commands::export::run(&d, &root, &dest, json)),
        Commands::Install {
            root,
            prefix,
            work_dir,
            profile,
            settings,
        } => load_descriptor(recipe, preset).and_then(|d| {
            commands::install::run(
                &d,
                &InstallArgs {
                    root: &root,
                    prefix: &prefix,
                    work_dir: work_dir.as_deref(),
                    profile: profile.as_deref(),
                    overrides: &settings,
                },
                json,
            )
        }),
        Commands::Init { dir, force } => commands::init::run(&dir, preset, force, json),
        Commands::Presets => commands::presets::run(json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}
