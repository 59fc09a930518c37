use anyhow::Result;
use clap::{Parser, Subcommand};
use srcaudit::commands::{
    check_command, init_config_command, list_runs_command, show_run_command, verify_command,
};

/// Debug-info source verification CLI.
///
/// This CLI is a thin wrapper around `srcaudit-core` (exposed in code as `srcaudit_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "srcaudit",
    version,
    about = "Verify debug-info function records against their C sources",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify every record of a records file against a source root.
    ///
    /// Records under excluded system roots are skipped and not counted.
    Verify {
        /// Source root the declared paths are resolved against.
        #[arg(long, default_value = ".")]
        root: String,

        /// JSON or YAML file with the function records to verify.
        #[arg(long)]
        records: String,

        /// Optional verifier config (JSON or YAML). Defaults are used when omitted.
        #[arg(long)]
        config: Option<String>,

        /// Optional audit database; the pass is recorded there when given.
        #[arg(long)]
        db: Option<String>,

        /// Optional path to write the concluded records back as JSON.
        #[arg(long)]
        output: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify a single function record given on the command line.
    Check {
        /// Source root the declared path is resolved against.
        #[arg(long, default_value = ".")]
        root: String,

        /// Function name as reported by debug info.
        #[arg(long)]
        name: String,

        /// Declared source path as reported by debug info.
        #[arg(long)]
        path: String,

        /// Declared line (0 when unknown).
        #[arg(long, default_value_t = 0)]
        line: u32,

        /// Optional verifier config (JSON or YAML).
        #[arg(long)]
        config: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the default verifier configuration to a file.
    InitConfig {
        /// Destination file; `.json`, `.yaml` or `.yml`.
        #[arg(long, default_value = "srcaudit.json")]
        path: String,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// List verification passes recorded in an audit database.
    ListRuns {
        /// Audit database path.
        #[arg(long)]
        db: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show one recorded pass and its failures (latest when no id is given).
    ShowRun {
        /// Audit database path.
        #[arg(long)]
        db: String,

        /// Run id; defaults to the most recent run.
        #[arg(long)]
        id: Option<i64>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Verify { root, records, config, db, output, json } => verify_command(
            &root,
            &records,
            config.as_deref(),
            db.as_deref(),
            output.as_deref(),
            json,
        )?,
        Command::Check { root, name, path, line, config, json } => {
            check_command(&root, &name, &path, line, config.as_deref(), json)?
        }
        Command::InitConfig { path, force } => init_config_command(&path, force)?,
        Command::ListRuns { db, json } => list_runs_command(&db, json)?,
        Command::ShowRun { db, id, json } => show_run_command(&db, id, json)?,
    }

    Ok(())
}
