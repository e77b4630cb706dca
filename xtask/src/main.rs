//! Workspace build tasks.
//!
//! Usage:
//!   cargo run -p vitrina-xtask -- redirects --out dist/_redirects
//!   cargo run -p vitrina-xtask -- routes
//!   cargo run -p vitrina-xtask -- schema
//!   cargo run -p vitrina-xtask -- bundle --release

use std::io::Write as _;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use vitrina::i18n::{Locale, RouteKey};
use vitrina::options::Options;
use vitrina::redirects::render_redirects_file;

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Build tasks for the vitrina workspace")]
struct Args {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Write the legacy redirect table in static-host `_redirects` syntax
    Redirects {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the localized route table
    Routes,
    /// Print the JSON Schema of the site options
    Schema,
    /// Build the browser bundle with wasm-pack
    Bundle {
        /// Optimized build
        #[arg(long)]
        release: bool,
        /// Output directory for the generated package
        #[arg(long, default_value = "dist/pkg")]
        out_dir: PathBuf,
    },
}

fn stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn routes() -> String {
    let mut table = String::new();
    for key in RouteKey::ALL {
        let paths: Vec<&str> = Locale::ALL.iter().map(|l| key.path(*l)).collect();
        table.push_str(&format!("{:<12} {}\n", format!("{key:?}"), paths.join("  ")));
    }
    table
}

fn bundle(release: bool, out_dir: &PathBuf) -> Result<()> {
    let mut cmd = Command::new("wasm-pack");
    let _ = cmd
        .args(["build", "crates/vitrina-web", "--target", "web", "--out-dir"])
        .arg(std::env::current_dir()?.join(out_dir));
    if !release {
        let _ = cmd.arg("--dev");
    }
    let status = cmd
        .status()
        .context("failed to run wasm-pack (is it installed?)")?;
    if !status.success() {
        bail!("wasm-pack exited with {status}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Task::Redirects { out: Some(path) } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, render_redirects_file())
                .with_context(|| format!("writing {}", path.display()))?;
        }
        Task::Redirects { out: None } => stdout(&render_redirects_file())?,
        Task::Routes => stdout(&routes())?,
        Task::Schema => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())?;
            stdout(&format!("{schema}\n"))?;
        }
        Task::Bundle { release, out_dir } => bundle(release, &out_dir)?,
    }
    Ok(())
}
