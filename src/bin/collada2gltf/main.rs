//! collada2gltf CLI - convert a serialized COLLADA document to glTF.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use collada2gltf::collada::Document;
use collada2gltf::convert::{convert_document, Options};
use collada2gltf::gltf::json;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    embed: bool,
    embed_buffer: bool,
    base_path: Option<PathBuf>,
    level: &'static str,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { level: "info", ..Default::default() };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.level = "debug",
            "-vv" | "--trace" => args.level = "trace",
            "-q" | "--quiet" => args.level = "error",
            "-e" | "--embed" => args.embed = true,
            "-b" | "--embed-buffer" => args.embed_buffer = true,
            "-o" | "--output" => {
                let value = iter.next().ok_or("missing value for --output")?;
                args.output = Some(PathBuf::from(value));
            }
            "-p" | "--base-path" => {
                let value = iter.next().ok_or("missing value for --base-path")?;
                args.base_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => {
                if args.input.is_some() {
                    return Err(format!("unexpected argument: {other}"));
                }
                args.input = Some(PathBuf::from(other));
            }
        }
    }
    Ok(args)
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_help();
            process::exit(2);
        }
    };
    init_logging(args.level);

    let Some(input) = args.input.as_deref() else {
        print_help();
        return;
    };
    if let Err(e) = run(input, &args) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(input: &Path, args: &Args) -> collada2gltf::Result<()> {
    info!("Converting {}", input.display());
    let document = Document::open(input)?;

    // Images resolve next to the input unless told otherwise.
    let base_path = args
        .base_path
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf));
    let mut options = Options::new().with_embedded(args.embed);
    if let Some(base_path) = base_path {
        options = options.with_base_path(base_path);
    }
    debug!(?options, "options");

    let (asset, report) = convert_document(&document, options)?;
    for (label, err) in &report.failures {
        warn!("{label} not converted: {err}");
    }

    let output = args.output.clone().unwrap_or_else(|| input.with_extension("gltf"));
    json::write_file(&asset, &output, args.embed_buffer)?;
    info!(
        "Wrote {} ({} nodes, {} meshes, {} animations, {} of {} objects failed)",
        output.display(),
        asset.nodes.len(),
        asset.meshes.len(),
        asset.animations.len(),
        report.failures.len(),
        report.delivered,
    );
    Ok(())
}

fn print_help() {
    println!("{} ({}) - COLLADA to glTF converter", collada2gltf::GENERATOR, collada2gltf::BUILD_DATE);
    println!();
    println!("USAGE:");
    println!("    collada2gltf [OPTIONS] <document.json>");
    println!();
    println!("OPTIONS:");
    println!("    -o, --output <file>       Output .gltf path (default: input with .gltf extension)");
    println!("    -e, --embed               Embed images as base64 data URIs");
    println!("    -b, --embed-buffer        Embed the binary buffer instead of writing a .bin");
    println!("    -p, --base-path <dir>     Directory image URIs resolve against");
    println!("    -v, --verbose             Show debug output");
    println!("    -vv, --trace              Show trace output (very verbose)");
    println!("    -q, --quiet               Only show errors");
    println!("    -h, --help                Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    collada2gltf scene.json                   # Writes scene.gltf + scene.bin");
    println!("    collada2gltf -e -b scene.json -o out.gltf # Single self-contained file");
    println!();
    println!("NOTES:");
    println!("    - RUST_LOG overrides the verbosity flags");
}
