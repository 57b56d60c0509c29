use qzip_rs::{decompress_stream, Compressor, Config, Policy};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use tracing_subscriber::EnvFilter;

/// Compresses or decompresses a file, or stdin when no file is given.
///
/// Usage: cargo run --example qzip -- [-d] [-1..-9] [--ngram] [filename]
///
/// Compressed output goes to `<filename>.qz`, or stdout when reading stdin.
/// Set `RUST_LOG=qzip_rs=debug` to watch the induction passes.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut decompressing = false;
    let mut config = Config::new();
    let mut filename = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-d" => decompressing = true,
            "--ngram" => config = config.with_policy(Policy::NgramSet),
            level if level.len() == 2 && level.starts_with('-') => {
                let Some(n) = level[1..].parse::<u8>().ok() else {
                    usage();
                };
                config = config.with_level(n);
            }
            name if !name.starts_with('-') && filename.is_none() => {
                filename = Some(name.to_string());
            }
            _ => usage(),
        }
    }

    let result = match filename {
        Some(name) => run_file(&name, decompressing, config),
        None => run_stdio(decompressing, config),
    };

    if let Err(e) = result {
        eprintln!("qzip: {e}");
        std::process::exit(1);
    }
}

fn usage() -> ! {
    eprintln!("Usage: qzip [-d] [-1..-9] [--ngram] [filename]");
    std::process::exit(2);
}

fn run_file(name: &str, decompressing: bool, config: Config) -> qzip_rs::Result<()> {
    let input = BufReader::new(File::open(name)?);

    if decompressing {
        let target = name.strip_suffix(".qz").unwrap_or(name).to_string() + ".out";
        let written = decompress_stream(input, BufWriter::new(File::create(&target)?))?;
        eprintln!("{name} -> {target}: {written} bytes");
        return Ok(());
    }

    let target = format!("{name}.qz");
    let stats =
        Compressor::new(config).compress_stream(input, BufWriter::new(File::create(&target)?))?;

    eprintln!("{name} -> {target}");
    eprintln!("  Input length:     {}", stats.input_length);
    eprintln!("  Block symbols:    {}", stats.block_symbols);
    eprintln!("  Rules:            {}", stats.num_rules);
    eprintln!("  Rule symbols:     {}", stats.rule_symbols);
    eprintln!("  Passes:           {}", stats.passes);
    eprintln!("  Encoded bytes:    {}", stats.encoded_bytes);
    eprintln!("  Ratio:            {:.1}%", stats.compression_ratio());
    Ok(())
}

fn run_stdio(decompressing: bool, config: Config) -> qzip_rs::Result<()> {
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    if decompressing {
        decompress_stream(stdin, stdout)?;
    } else {
        let stats = Compressor::new(config).compress_stream(stdin, stdout)?;
        eprintln!(
            "{} -> {} bytes ({:.1}%)",
            stats.input_length,
            stats.encoded_bytes,
            stats.compression_ratio()
        );
    }
    Ok(())
}
