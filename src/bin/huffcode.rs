use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use huffcode::io::{
    read_bits, read_decode_table, write_bits, write_decode_table, write_encode_table,
    write_frequencies,
};
use huffcode::{count_frequencies, decode, CharStream, CodecConfig, Config, HuffmanCodec, Result};

/// Build Huffman codes for text files and encode or decode with them.
#[derive(Parser, Debug)]
#[command(author, version, about = "Huffman encoder/decoder for text files", long_about = None)]
struct Cli {
    /// JSON codec configuration; HUFFCODE_* environment variables otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Count whitespace characters as symbols
    #[arg(long, global = true)]
    keep_whitespace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the code table, the END line and the encoded bits
    Encode {
        /// Input text file
        file: PathBuf,
    },
    /// Read a code table and encoded bits and print the decoded text
    Decode {
        /// File produced by `encode`
        file: PathBuf,
    },
    /// Print the symbol counts of a file
    Freq {
        /// Input text file
        file: PathBuf,
    },
    /// Print the Huffman tree of a file, depth first
    Tree {
        /// Input text file
        file: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<CodecConfig> {
    let mut config = match &cli.config {
        Some(path) => CodecConfig::load_from_file(path)?,
        None => CodecConfig::from_env()?,
    };
    if cli.keep_whitespace {
        config.skip_whitespace = false;
    }
    Ok(config)
}

fn codec_for(file: &Path, config: &CodecConfig) -> Result<(HuffmanCodec<char>, CharStream<File>)> {
    let mut input = CharStream::open(file, config.skip_whitespace)?;
    let codec = HuffmanCodec::from_stream(&mut input)?;
    Ok((codec, input))
}

/// Run one command, rendering its whole output into `out`
///
/// Nothing reaches stdout unless the command succeeds.
fn render(cli: &Cli, config: &CodecConfig, out: &mut Vec<u8>) -> Result<()> {
    match &cli.command {
        Command::Encode { file } => {
            let (codec, mut input) = codec_for(file, config)?;
            write_encode_table(out, codec.encode_table(), config)?;
            let bits = codec.encode(&mut input)?;
            log::info!(
                "Encoded {} symbols into {} bits",
                codec.frequencies().total(),
                bits.len()
            );
            write_bits(out, &bits)?;
        }
        Command::Decode { file } => {
            let mut reader = BufReader::new(File::open(file)?);
            let table = read_decode_table(&mut reader, config)?;
            let bits = read_bits(&mut reader)?;
            let text: String = decode(bits.iter(), &table)?.into_iter().collect();
            if config.echo_decode_table {
                write_decode_table(out, &table, config)?;
            }
            writeln!(out, "{}", text)?;
        }
        Command::Freq { file } => {
            let mut input = CharStream::open(file, config.skip_whitespace)?;
            let frequencies = count_frequencies(&mut input)?;
            write_frequencies(out, &frequencies)?;
        }
        Command::Tree { file } => {
            let (codec, _) = codec_for(file, config)?;
            write!(out, "{}", codec.tree().render_dfs())?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut output = Vec::new();
    render(cli, &config, &mut output)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    huffcode::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed ({} error)", e.category());
            eprintln!("huffcode: {}", e);
            ExitCode::FAILURE
        }
    }
}
