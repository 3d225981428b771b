//! VeilNote CLI - Command line interface for key arrays and documents.
//!
//! This tool covers the surrounding application's duties: generating and
//! inspecting key arrays, and encrypting/decrypting document files. The
//! core crates perform no logging or prompting themselves.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use veilnote_document::{load_document, save_document, Envelope};
use veilnote_keyarray::{derive_key_material, validate_password, KeyArray, LAYER_COUNT};

#[derive(Parser)]
#[command(name = "veilnote")]
#[command(about = "VeilNote - Pattern-keyed document encryption")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key-array file.
    Keygen {
        /// Where to write the key array.
        #[arg(short, long)]
        output: PathBuf,

        /// Deterministic seed. For testing only; a seeded array is not a
        /// real secret.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print one layer of a key array.
    ShowLayer {
        /// Path to the key-array file.
        #[arg(short, long)]
        key: PathBuf,

        /// Layer index (0-9).
        #[arg(short, long)]
        index: usize,
    },

    /// Encrypt a text file into a document.
    Encrypt {
        /// Path to the key-array file.
        #[arg(short, long)]
        key: PathBuf,

        /// Plaintext input file (UTF-8).
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the encrypted document.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decrypt a document.
    Decrypt {
        /// Path to the key-array file.
        #[arg(short, long)]
        key: PathBuf,

        /// Encrypted document file.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a document's version tag without decrypting it.
    Info {
        /// Encrypted document file.
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Keygen { output, seed } => cmd_keygen(&output, seed),
        Commands::ShowLayer { key, index } => cmd_show_layer(&key, index),
        Commands::Encrypt { key, input, output } => cmd_encrypt(&key, &input, &output),
        Commands::Decrypt { key, input, output } => cmd_decrypt(&key, &input, output.as_deref()),
        Commands::Info { input } => cmd_info(&input),
    }
}

/// Prompt for the 10-digit password without echoing it.
fn prompt_password() -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(
        rpassword::prompt_password("Enter 10-digit password: ")
            .context("Failed to read password")?,
    );
    validate_password(&password)?;
    Ok(password)
}

fn cmd_keygen(output: &std::path::Path, seed: Option<u64>) -> Result<()> {
    let array = match seed {
        Some(seed) => {
            info!("Generating seeded key array (not suitable for real secrets)");
            KeyArray::generate_seeded(seed)
        }
        None => KeyArray::generate(),
    };
    array
        .dump(output)
        .context("Failed to write key-array file")?;

    println!("Key array written to {}", output.display());
    println!("  Layers: {LAYER_COUNT}");
    Ok(())
}

fn cmd_show_layer(key: &std::path::Path, index: usize) -> Result<()> {
    let array = KeyArray::load(key).context("Failed to load key-array file")?;
    println!("{}", array.layer_text(index)?);
    Ok(())
}

fn cmd_encrypt(key: &std::path::Path, input: &std::path::Path, output: &std::path::Path) -> Result<()> {
    let array = KeyArray::load(key).context("Failed to load key-array file")?;
    let text = fs::read_to_string(input).context("Failed to read input file")?;

    let password = prompt_password()?;
    let material = derive_key_material(&password, &array)?;
    save_document(output, &text, &material).context("Failed to write document")?;

    info!("Encrypted {} bytes", text.len());
    println!("Document written to {}", output.display());
    Ok(())
}

fn cmd_decrypt(
    key: &std::path::Path,
    input: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let array = KeyArray::load(key).context("Failed to load key-array file")?;

    let password = prompt_password()?;
    let material = derive_key_material(&password, &array)?;
    let text = load_document(input, &material).context("Failed to decrypt document")?;

    match output {
        Some(path) => {
            fs::write(path, text).context("Failed to write output file")?;
            println!("Plaintext written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_info(input: &std::path::Path) -> Result<()> {
    let text = fs::read_to_string(input).context("Failed to read document")?;
    let envelope = Envelope::from_json(&text).context("Failed to parse document")?;

    println!("Document: {}", input.display());
    println!("  Version: {}", envelope.version());
    println!(
        "  Authenticated: {}",
        if envelope.version() >= 2 { "yes" } else { "no" }
    );
    Ok(())
}
