use ccbloom::{
    BloomFilter, BloomFilterConfigBuilder,
    bloom::{BloomFilterOps, BloomFilterStats, Layout},
    common::{bits2hr, bytes2hr},
    config::CliDefaults,
    wordlist::read_words_from_path,
};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a filter from a newline-delimited word list
    Build {
        /// Path to the word list
        wordlist: PathBuf,

        /// Where to write the filter file
        #[arg(short, long)]
        output: PathBuf,

        /// False positive rate (between 0 and 1) [env: CCBF_FALSE_POSITIVE_RATE]
        #[arg(short, long)]
        fpr: Option<f64>,

        /// Format version written to the header [env: CCBF_FORMAT_VERSION]
        #[arg(long)]
        format_version: Option<u16>,

        /// Write one bit per flag instead of one byte
        #[arg(long)]
        packed: bool,
    },

    /// Check whether words are in a filter
    Check {
        /// Path to the filter file
        filter: PathBuf,

        /// Format version the file must carry [env: CCBF_FORMAT_VERSION]
        #[arg(long)]
        format_version: Option<u16>,

        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Display information about a filter file
    Info {
        /// Path to the filter file
        filter: PathBuf,

        /// Format version the file must carry [env: CCBF_FORMAT_VERSION]
        #[arg(long)]
        format_version: Option<u16>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = CliDefaults::from_env()?;
    debug!(?defaults, "loaded cli defaults");

    match cli.command {
        Commands::Build {
            wordlist,
            output,
            fpr,
            format_version,
            packed,
        } => {
            let words = read_words_from_path(&wordlist)?;
            let config = BloomFilterConfigBuilder::default()
                .expected_items(words.len())
                .false_positive_probability(
                    fpr.unwrap_or(defaults.false_positive_rate),
                )
                .build()?;

            let mut filter = BloomFilter::new(config)?;
            for word in &words {
                filter.insert(word.as_bytes());
            }

            let layout = if packed {
                Layout::Packed
            } else {
                Layout::BytePerBit
            };
            let version = format_version.unwrap_or(defaults.format_version);
            filter.save_to_path(&output, version, layout)?;
            info!(path = %output.display(), words = words.len(), "filter saved");

            println!(
                "Wrote {} words to {} ({} bits, {} hash functions, version {})",
                words.len(),
                output.display(),
                filter.size(),
                filter.hash_count(),
                version
            );
        }
        Commands::Check {
            filter,
            format_version,
            words,
        } => {
            let version = format_version.unwrap_or(defaults.format_version);
            let filter = BloomFilter::load_from_path(&filter, version)?;

            for word in &words {
                if filter.contains(word.as_bytes()) {
                    println!("{word}: probably present");
                } else {
                    println!("{word}: definitely absent");
                }
            }
        }
        Commands::Info {
            filter: path,
            format_version,
            json,
        } => {
            let version = format_version.unwrap_or(defaults.format_version);
            let filter = BloomFilter::load_from_path(&path, version)?;
            let summary = filter.summary();

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Bloom Filter:");
            println!("  File: {}", path.display());
            println!("  Format version: {version}");
            println!("  Size: {} bits ({})", summary.size, bits2hr(summary.size));
            println!("  Number of hash functions: {}", summary.hash_count);
            println!("  In-memory footprint: {}", bytes2hr(filter.memory_usage()));
            println!("\nCurrent State:");
            println!("  Bits set: {}", summary.bits_set);
            println!("  Fill ratio: {:.4}", summary.fill_ratio);
            println!(
                "  Estimated false positive rate: {:.6}",
                summary.estimated_false_positive_rate
            );
            println!("  Estimated item count: {:.0}", summary.estimated_count);
        }
    }

    Ok(())
}
