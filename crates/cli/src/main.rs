use anyhow::Result;
use clap::{Parser, Subcommand};
use decomp_progress::commands::{
    build_report_command, classify_class_command, demangle_command, init_project_command,
    project_info_command,
};

/// Decompilation progress reporting CLI.
///
/// This CLI is a thin wrapper around `progress-core` (exposed in code as `progress_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "decomp-progress",
    version,
    about = "Classify decompilation progress and build namespace hierarchies",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new progress project at the given root.
    ///
    /// This will:
    /// - Create a `.progress` metadata directory.
    /// - Create `data/overrides` and `reports` directories.
    /// - Write a `.progress/project.json` config file.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show basic information about an existing project.
    ///
    /// This reads `.progress/project.json` and reports key paths and whether
    /// the input snapshots are present.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Demangle one or more symbol names.
    Demangle {
        /// Raw symbols (mangled or plain).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Classify one class against the project's function table and overrides.
    ClassifyClass {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Fully qualified class name (e.g. `ksys::act::BaseProcLink`).
        #[arg(long)]
        name: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run the full pipeline and write the tree, graph, and summary reports.
    BuildReport {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Which hierarchy to produce: tree, graph, or both.
        #[arg(long, default_value = "both")]
        format: String,

        /// Print the report to stdout instead of writing files.
        #[arg(long, default_value_t = false)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    decomp_progress::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::InitProject { root, name } => init_project_command(&root, name)?,
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::Demangle { symbols, json } => demangle_command(&symbols, json)?,
        Command::ClassifyClass { root, name, json } => {
            classify_class_command(&root, &name, json)?
        }
        Command::BuildReport { root, format, stdout } => {
            build_report_command(&root, &format, stdout)?
        }
    }

    Ok(())
}
