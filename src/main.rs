use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ciphernest::{self, Config, ErrorResponse, InspectResponse, Quality, SecretFile};

#[derive(Parser)]
#[command(name = "ciphernest", version = "1.0.0", about = "Authenticated LSB audio steganography")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a carrier already holds a payload, or how much free space remains
    Inspect {
        carrier: PathBuf,
        #[arg(short, long, default_value = "medium")]
        quality: String,
        #[arg(short, long)]
        compressed: bool,
        #[arg(short, long)]
        password: Option<String>,
        /// Secret files to plan capacity for (ignored if the carrier already holds a payload)
        #[arg(short, long)]
        secret: Vec<PathBuf>,
        /// Emit the response as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Embed one or more secret files into a carrier, writing a new carrier file
    Embed {
        carrier: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value = "medium")]
        quality: String,
        #[arg(short, long)]
        compressed: bool,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long, required = true, num_args = 1..)]
        secret: Vec<PathBuf>,
    },
    /// Extract and rebuild every secret file from a carrier
    Extract {
        carrier: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn parse_quality(s: &str) -> Result<Quality, Box<dyn std::error::Error>> {
    match s {
        "very_low" => Ok(Quality::VeryLow),
        "low" => Ok(Quality::Low),
        "medium" => Ok(Quality::Medium),
        "high" => Ok(Quality::High),
        other => Err(format!("unknown quality {other:?} (expected very_low, low, medium, high)").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env().unwrap_or_else(|_| {
        eprintln!("warning: SECRET_KEY not set, using an empty process key");
        Config::with_secret_key(Vec::new())
    });

    match Cli::parse().command {
        // ── Inspect ──────────────────────────────────────────────────────────
        Commands::Inspect { carrier, quality, compressed, password, secret, json } => {
            let (_meta, samples) = ciphernest::wav::read_wav(&carrier)?;

            let result = match ciphernest::get_header_blocks(&samples, password.as_deref(), &config.secret_key) {
                Ok(Some(blocks)) => match InspectResponse::already_embedded(&blocks) {
                    Ok(resp) => {
                        if !json {
                            if let InspectResponse::AlreadyEmbedded { filenames, sizes, version } = &resp {
                                println!("code: 03 (already embedded)");
                                println!("  hmac:      {}…", hex::encode(&blocks.hmac[..6]));
                                println!("  version:   {version}");
                                println!("  filenames: {}", filenames.join(", "));
                                println!("  sizes:     {sizes:?}");
                            }
                        }
                        Ok(resp)
                    }
                    Err(e) => {
                        if !json {
                            println!("code: {}", e.code());
                            println!("  {e}");
                        }
                        Err(e)
                    }
                },
                Ok(None) => {
                    let quality = parse_quality(&quality)?;
                    let mut files = secret
                        .iter()
                        .map(SecretFile::from_path)
                        .collect::<Result<Vec<_>, _>>()?;
                    let space = ciphernest::free_space(
                        &samples,
                        &mut files,
                        quality,
                        compressed,
                        password.as_deref(),
                        &config.secret_key,
                    )?;
                    if !json {
                        println!("code: 00");
                        println!("  free_space_bytes: {space}");
                    }
                    Ok(InspectResponse::free_space(space))
                }
                Err(e) => {
                    if !json {
                        println!("code: {}", e.code());
                        println!("  {e}");
                    }
                    Err(e)
                }
            };
            if json {
                match &result {
                    Ok(resp) => println!("{}", serde_json::to_string(resp)?),
                    Err(e) => println!("{}", serde_json::to_string(&ErrorResponse::from(e))?),
                }
            }
        }

        // ── Embed ────────────────────────────────────────────────────────────
        Commands::Embed { carrier, output, quality, compressed, password, secret } => {
            let quality = parse_quality(&quality)?;
            let (meta, mut samples) = ciphernest::wav::read_wav(&carrier)?;
            let mut files = secret
                .iter()
                .map(SecretFile::from_path)
                .collect::<Result<Vec<_>, _>>()?;

            ciphernest::embed(
                &mut samples,
                &mut files,
                quality,
                compressed,
                password.as_deref(),
                &config.secret_key,
            )?;
            ciphernest::wav::write_wav(&output, meta, &samples)?;
            println!("embedded {} file(s) into {}", files.len(), output.display());
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { carrier, output_dir, password } => {
            let (_meta, samples) = ciphernest::wav::read_wav(&carrier)?;
            let payload = ciphernest::extract_data(&samples, password.as_deref(), &config.secret_key)?;

            std::fs::create_dir_all(&output_dir)?;
            let rebuilt = ciphernest::archive_builder::rebuild(&payload, password.as_deref())?;
            for (name, bytes) in &rebuilt {
                let path = output_dir.join(name);
                std::fs::write(&path, bytes)?;
                println!("  extracted {} ({} B)", path.display(), bytes.len());
            }
            println!("extracted {} file(s) to {}", rebuilt.len(), output_dir.display());
        }
    }

    Ok(())
}
