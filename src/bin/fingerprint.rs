use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use custody_ledger::fingerprint::{fingerprint_file, fingerprint_reader, verify_fingerprint_reader};

/// Print the SHA-256 evidence fingerprint of files (or stdin)
#[derive(Parser, Debug)]
#[command(name = "fingerprint", version)]
struct Args {
    /// Files to fingerprint; reads stdin when empty
    files: Vec<PathBuf>,

    /// Recorded fingerprint to check a single file (or stdin) against;
    /// exits with status 1 on mismatch
    #[arg(long)]
    expect: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(expected) = &args.expect {
        let matches = match args.files.as_slice() {
            [] => verify_fingerprint_reader(std::io::stdin().lock(), expected)
                .context("Failed to read stdin")?,
            [path] => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                verify_fingerprint_reader(std::io::BufReader::new(file), expected)
                    .with_context(|| format!("Failed to fingerprint {}", path.display()))?
            }
            _ => anyhow::bail!("--expect checks exactly one input"),
        };

        if matches {
            println!("OK");
            return Ok(());
        }
        eprintln!("MISMATCH: content does not match {}", expected.trim());
        std::process::exit(1);
    }

    if args.files.is_empty() {
        let digest = fingerprint_reader(std::io::stdin().lock()).context("Failed to read stdin")?;
        println!("{}  -", digest);
        return Ok(());
    }

    for path in &args.files {
        let digest = fingerprint_file(path)
            .with_context(|| format!("Failed to fingerprint {}", path.display()))?;
        println!("{}  {}", digest, path.display());
    }

    Ok(())
}
