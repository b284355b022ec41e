use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "morphogen", version)]
struct Cli {
    /// Log engine events (debug level).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed, run a number of steps and write the final canvas.
    Run(RunArgs),
    /// Write the default chain set as XML.
    DefaultConfig(DefaultConfigArgs),
    /// List the operation catalog with parameter defaults.
    Catalog,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Chain configuration XML. The default chain set is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generator options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Override the canvas size.
    #[arg(long)]
    size: Option<u32>,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Seed with gray noise.
    #[arg(long)]
    grayscale: bool,

    /// Iterate chains in parallel.
    #[arg(long)]
    parallel: bool,

    /// Number of steps to run.
    #[arg(long, default_value_t = 100)]
    steps: u64,

    /// Output image path (format from extension).
    #[arg(long)]
    out: PathBuf,

    /// Also write numbered frames into this directory.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Frame interval for `--frames`.
    #[arg(long, default_value_t = 10)]
    every: u64,

    /// Save the chain configuration used for the run.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DefaultConfigArgs {
    /// Output XML path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::DefaultConfig(args) => cmd_default_config(args),
        Command::Catalog => cmd_catalog(),
    }
}

fn load_opts(args: &RunArgs) -> anyhow::Result<morphogen::GeneratorOpts> {
    let mut opts = match &args.opts {
        Some(path) => morphogen::GeneratorOpts::from_path(path)
            .with_context(|| format!("load options '{}'", path.display()))?,
        None => morphogen::GeneratorOpts::default(),
    };
    if let Some(size) = args.size {
        opts.size = size;
    }
    if let Some(seed) = args.seed {
        opts.seed = seed;
    }
    opts.grayscale_seed |= args.grayscale;
    opts.parallel |= args.parallel;
    opts.validate()?;
    Ok(opts)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args)?;
    let grayscale = opts.grayscale_seed;
    let mut generator = morphogen::Generator::new(opts)?;

    if let Some(path) = &args.config {
        generator
            .load_config(path)
            .with_context(|| format!("load configuration '{}'", path.display()))?;
        generator.seed(grayscale)?;
    }

    let stats = match &args.frames {
        Some(dir) => {
            let mut display = morphogen::PngSequenceDisplay::new(dir, "frame")?;
            morphogen::run_steps(&mut generator, args.steps, args.every, &mut display)?
        }
        None => {
            let mut display = NullDisplay;
            morphogen::run_steps(&mut generator, args.steps, u64::MAX, &mut display)?
        }
    };

    ensure_parent(&args.out)?;
    generator
        .write_output_image(&args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    if let Some(path) = &args.save_config {
        ensure_parent(path)?;
        generator.save_config(path)?;
    }

    let sums = generator.color_sums();
    eprintln!(
        "ran {} steps in {:.2?}; color sums r={:.3} g={:.3} b={:.3}",
        stats.steps, stats.elapsed, sums[0], sums[1], sums[2]
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_default_config(args: DefaultConfigArgs) -> anyhow::Result<()> {
    let size = morphogen::ImageSize::new(morphogen::ImageSize::MIN)?;
    let configs: Vec<morphogen::ChainConfig> = morphogen::default_chain_set(size)
        .iter()
        .map(morphogen::ChainConfig::capture)
        .collect();
    let xml = morphogen::write_config(&configs)?;
    match args.out {
        Some(path) => {
            ensure_parent(&path)?;
            std::fs::write(&path, xml)
                .with_context(|| format!("write configuration '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{xml}"),
    }
    Ok(())
}

fn cmd_catalog() -> anyhow::Result<()> {
    for kind in morphogen::OperationKind::ALL {
        println!("{:>2}  {}", kind.index(), kind.name());
        let op = morphogen::Operation::new(kind);
        for p in op.parameters() {
            println!(
                "      {:<14} {:<18} {}",
                p.name(),
                p.value().type_tag(),
                describe(&p.value())
            );
        }
    }
    Ok(())
}

fn describe(value: &morphogen::ParamValue) -> String {
    use morphogen::{Interpolation, MorphShape, MorphType, OptionCode, ParamValue};

    fn option<T: OptionCode>(code: i32) -> String {
        T::from_code(code).map_or_else(|| code.to_string(), |v| v.display_name().to_owned())
    }

    match value {
        ParamValue::Bool(v) => v.to_string(),
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Double(v) => v.to_string(),
        ParamValue::MorphType(c) => option::<MorphType>(*c),
        ParamValue::MorphShape(c) => option::<MorphShape>(*c),
        ParamValue::Interpolation(c) => option::<Interpolation>(*c),
        ParamValue::Kernel(vs) => format!("{vs:?}"),
    }
}

/// Display that discards frames; used when only the final image is wanted.
struct NullDisplay;

impl morphogen::DisplayPort for NullDisplay {
    fn show_frame(
        &mut self,
        _iteration: u64,
        _frame: &morphogen::RgbImage,
        _cursor: morphogen::PixelCoord,
    ) -> morphogen::MorphResult<()> {
        Ok(())
    }
}
