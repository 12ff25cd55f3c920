use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use word_huffman::files::collect_files;
use word_huffman::{CodecConfig, HuffmanCodec, HuffmanError};

/// Build word-level Huffman codebooks and compress or decompress text with them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["build", "compress", "decompress"])))]
struct Args {
    /// Build a codebook from PATH
    #[arg(short = 'b')]
    build: bool,

    /// Compress PATH with CODEBOOK, writing <file>.hcz
    #[arg(short = 'c')]
    compress: bool,

    /// Decompress PATH (<file>.hcz) with CODEBOOK
    #[arg(short = 'd')]
    decompress: bool,

    /// Treat PATH as a directory and process every file below it
    #[arg(short = 'R')]
    recursive: bool,

    /// Escape marker for a new codebook (default: chosen automatically)
    #[arg(short, long, value_name = "MARKER")]
    escape: Option<String>,

    /// Where -b writes the codebook
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// File or directory to process
    path: PathBuf,

    /// Codebook to compress or decompress with
    codebook: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = CodecConfig::default();
    if let Some(escape) = &args.escape {
        config = config.with_escape(escape.clone());
    }
    if let Some(output) = &args.output {
        config = config.with_codebook_name(output.to_string_lossy());
    }

    if args.build {
        if args.codebook.is_some() {
            return Err(HuffmanError::InvalidUsage("-b takes no codebook argument".into()).into());
        }
        let inputs = collect_files(&args.path, args.recursive)?;
        let codec = HuffmanCodec::build_from_files(&inputs, config)?;
        let out = PathBuf::from(&codec.config().codebook_name);
        codec.write_codebook(&out)?;
        info!(codebook = %out.display(), "done");
        return Ok(());
    }

    if args.output.is_some() || args.escape.is_some() {
        return Err(HuffmanError::InvalidUsage("--output and --escape only apply to -b".into()).into());
    }
    let codebook = args
        .codebook
        .as_deref()
        .ok_or_else(|| HuffmanError::InvalidUsage("-c and -d need a codebook argument".into()))?;
    let inputs = collect_files(&args.path, args.recursive)?;
    let codec = HuffmanCodec::from_codebook_file(codebook, config)
        .with_context(|| format!("loading codebook {}", codebook.display()))?;

    let outputs = if args.compress {
        codec.compress_files(&inputs)?
    } else {
        codec.decompress_files(&inputs)?
    };
    info!(files = outputs.len(), "done");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("FATAL ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usage_error(argv: &[&str]) -> bool {
        let args = Args::try_parse_from(argv.iter().copied()).unwrap();
        let err = run(args).unwrap_err();
        matches!(err.downcast_ref::<HuffmanError>(), Some(HuffmanError::InvalidUsage(_)))
    }

    #[test]
    fn test_exactly_one_mode() {
        assert!(Args::try_parse_from(["hcz", "-b", "-c", "in.txt"]).is_err());
        assert!(Args::try_parse_from(["hcz", "-c", "-d", "in.txt", "book"]).is_err());
        assert!(Args::try_parse_from(["hcz", "in.txt"]).is_err());
        assert!(Args::try_parse_from(["hcz", "-c", "in.txt", "book"]).is_ok());
    }

    #[test]
    fn test_compress_and_decompress_need_codebook() {
        assert!(usage_error(&["hcz", "-c", "in.txt"]));
        assert!(usage_error(&["hcz", "-d", "in.txt.hcz"]));
    }

    #[test]
    fn test_build_takes_no_codebook() {
        assert!(usage_error(&["hcz", "-b", "in.txt", "book"]));
    }

    #[test]
    fn test_build_only_options() {
        assert!(usage_error(&["hcz", "-c", "-o", "out", "in.txt", "book"]));
        assert!(usage_error(&["hcz", "-d", "-e", "#", "in.txt.hcz", "book"]));
    }
}
