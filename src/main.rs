use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use swctree::model::Morphology;
use swctree::swc::{GapPolicy, SwcFlavor, SwcLoader};
use tracing_subscriber::EnvFilter;

/// Convention used to read the samples
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// Strict file order, single root
    Raw,
    /// Unordered samples, forests, single-sample somas
    Neuron,
    /// AllenDB / Sonata: soma at the origin
    Allen,
}

/// Load an SWC file and print its branches
#[derive(Parser, Debug)]
#[command(name = "swctree", version, long_about = None)]
struct Args {
    /// Path to the SWC file
    file: PathBuf,

    /// How samples become segments
    #[arg(short, long, value_enum, default_value_t = Mode::Raw)]
    mode: Mode,

    /// Extend neurites to touch the soma (allen mode only)
    #[arg(long, default_value_t = false)]
    no_gaps: bool,

    /// Read the file through a buffer instead of loading it whole
    #[arg(long, default_value_t = false)]
    buffered: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "swctree=debug" } else { "swctree=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let flavor = match args.mode {
        Mode::Raw => SwcFlavor::Arbor,
        Mode::Neuron => SwcFlavor::Neuron,
        Mode::Allen => SwcFlavor::Allen {
            gaps: GapPolicy::from_no_gaps(args.no_gaps),
        },
    };
    if args.no_gaps && !matches!(args.mode, Mode::Allen) {
        tracing::warn!(target: "swctree", "--no-gaps only applies to allen mode");
    }

    let mut loader = SwcLoader::for_file(&args.file).with_flavor(flavor);
    if args.buffered {
        loader = loader.with_buffered_source();
    }

    let tree = match loader.load() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}: {} segments, {} roots", args.file.display(), tree.size(), tree.num_roots());
    let morph = Morphology::new(tree);
    println!("{morph}");
    ExitCode::SUCCESS
}
