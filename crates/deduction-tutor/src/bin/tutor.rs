//! `tutor`: check statements, start proofs and replay edits from the command line.
//!
//! **Usage:**
//! ```text
//! tutor check "P and Q" "Q and P"
//! tutor start "P implies Q implies R" "Q implies P implies R" [--chain]
//! tutor replay --edits edits.json [--snapshot proof.json] [--chain]
//! ```
//!
//! Edits are a JSON array of tagged objects such as
//! `{"type": "set_rule", "line": 1, "rule": "DirectProof"}`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deduction_tutor::parser::StatementField;
use deduction_tutor::{
    decode_chain, decode_tree, encode_chain, encode_tree, render_chain, render_tree, ChainProof, Editor,
    RenderedLine, Session, StatementEntry, TreeProof, TutorConfig,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tutor", about = "Incremental checker for propositional proofs")]
struct Args {
    /// Log every accepted and rejected edit
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with editor defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report whether both formulas of a statement parse
    Check { start: String, end: String },

    /// Print a fresh proof of a statement
    Start {
        start: String,
        end: String,
        /// Use an equivalence chain instead of a natural-deduction proof
        #[arg(long)]
        chain: bool,
    },

    /// Apply a list of edits to a snapshot and print the result
    Replay {
        /// Snapshot to start from (default: a fresh proof of the configured statement)
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// JSON array of edits
        #[arg(long)]
        edits: PathBuf,
        #[arg(long)]
        chain: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = match &args.config {
        Some(path) => {
            TutorConfig::from_file(path).with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => TutorConfig::default(),
    };

    match args.command {
        Command::Check { start, end } => check(&start, &end),
        Command::Start { start, end, chain } => {
            let entry = StatementEntry::new(start, end);
            let Some((start, end)) = entry.statement() else {
                return check(entry.text(StatementField::Start), entry.text(StatementField::End));
            };
            if chain {
                print_chain(&ChainProof::new(start, end))
            } else {
                print_tree(&TreeProof::bootstrap(start, end, config.goal_direction_backward))
            }
        }
        Command::Replay { snapshot, edits, chain } => {
            let snapshot = match &snapshot {
                Some(path) => read(path)?,
                None => String::new(),
            };
            if chain {
                let proof = decode_chain(&snapshot, &config).context("invalid chain snapshot")?;
                let proof = replay::<ChainProof>(proof, &edits)?;
                print_chain(&proof)
            } else {
                let proof = decode_tree(&snapshot, &config).context("invalid proof snapshot")?;
                let proof = replay::<TreeProof>(proof, &edits)?;
                print_tree(&proof)
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn check(start: &str, end: &str) -> Result<()> {
    let entry = StatementEntry::new(start, end);
    for field in [StatementField::Start, StatementField::End] {
        let name = match field {
            StatementField::Start => "start",
            StatementField::End => "end",
        };
        match (entry.proposition(field), entry.error(field)) {
            (Some(prop), _) => println!("{:>5}: {}", name, prop),
            (None, Some(err)) => println!("{:>5}: {}", name, err),
            (None, None) => println!("{:>5}: (empty)", name),
        }
    }
    if !entry.is_ready() {
        bail!("statement is not ready");
    }
    Ok(())
}

fn replay<E>(proof: E, path: &Path) -> Result<E>
where
    E: Editor,
    E::Edit: DeserializeOwned,
{
    let edits: Vec<E::Edit> = serde_json::from_str(&read(path)?).context("invalid edit list")?;
    let count = edits.len();
    let mut session = Session::new(proof).with_sink(|json: &str| info!(bytes = json.len(), "snapshot published"));
    for (i, edit) in edits.into_iter().enumerate() {
        let description = format!("{:?}", edit);
        session
            .apply(edit)
            .with_context(|| format!("edit {} of {} rejected: {}", i + 1, count, description))?;
    }
    Ok(session.into_state())
}

fn print_tree(proof: &TreeProof) -> Result<()> {
    for line in render_tree(proof)? {
        print_line(&line);
    }
    println!();
    println!("solved: {}", proof.is_solved()?);
    println!("{}", encode_tree(proof)?);
    Ok(())
}

fn print_chain(proof: &ChainProof) -> Result<()> {
    let rendered = render_chain(proof)?;
    println!("      {}", rendered.start.text);
    for line in &rendered.lines {
        print_line(line);
    }
    println!();
    println!("solved: {}", proof.is_solved());
    println!("{}", encode_chain(proof)?);
    Ok(())
}

fn print_line(line: &RenderedLine) {
    let status = if line.correct {
        "ok"
    } else if line.error {
        "ERR"
    } else {
        ".."
    };
    let label = line.label.as_deref().unwrap_or("\u{2261}");
    let indent = "  ".repeat(line.depth.saturating_sub(1));
    let arrow = if line.forward { "\u{2193}" } else { "\u{2191}" };
    let rule = line.rule_name.unwrap_or("?");
    let arguments: Vec<&str> = line.arguments.iter().map(|a| a.as_deref().unwrap_or("_")).collect();
    if arguments.is_empty() {
        println!("[{:>3}] {}{:<8} {}  {} {}", status, indent, label, line.proposition.text, arrow, rule);
    } else {
        println!(
            "[{:>3}] {}{:<8} {}  {} {} ({})",
            status,
            indent,
            label,
            line.proposition.text,
            arrow,
            rule,
            arguments.join(", ")
        );
    }
}
