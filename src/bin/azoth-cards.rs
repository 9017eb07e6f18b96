use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use azoth_cards::{
    ArtInput, BasisRegistry, BasisSet, CardCompositor, CardRecord, Category, FanSpec, GridSpec,
    RenderCache, RenderConfig, Renderable, Rng64, TextureSynthesizer, assets::decode, layout, model,
};

#[derive(Parser, Debug)]
#[command(name = "azoth-cards", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Render config JSON; fields it omits keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font file, overriding the config.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Badge icon directory, overriding the config.
    #[arg(long, global = true)]
    icons: Option<PathBuf>,

    /// Directory of `<id>.basis.json` sets. Without it a built-in rectangle basis is used.
    #[arg(long = "basis-dir", global = true)]
    basis_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card record.
    Render(RenderArgs),
    /// Render every record of a deck concurrently.
    Batch(BatchArgs),
    /// Tile a deck into a widescreen grid.
    Grid(GridArgs),
    /// Fan a random hand drawn from a deck.
    Hand(HandArgs),
    /// Synthesize a standalone texture and its parameter sidecar.
    Texture(TextureArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Card record JSON.
    #[arg(long)]
    card: PathBuf,

    #[arg(long = "out-dir")]
    out_dir: PathBuf,

    /// Art file used instead of the record's own.
    #[arg(long)]
    art: Option<PathBuf>,

    /// Synthesize the art from this seed instead of reading a file.
    #[arg(long)]
    seed: Option<u64>,

    /// Basis set id for synthesized art; random when unset.
    #[arg(long)]
    basis: Option<String>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON array of card records.
    #[arg(long)]
    deck: PathBuf,

    #[arg(long = "out-dir")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct GridArgs {
    #[arg(long)]
    deck: PathBuf,

    /// Rendered cards are reused from, and written to, this directory.
    #[arg(long = "cache-dir")]
    cache_dir: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct HandArgs {
    #[arg(long)]
    deck: PathBuf,

    #[arg(long = "cache-dir")]
    cache_dir: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Cards in the hand.
    #[arg(long, default_value_t = 6)]
    size: usize,

    /// Total fan spread in degrees.
    #[arg(long, default_value_t = 30.0)]
    spread: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Parser, Debug)]
struct TextureArgs {
    /// Basis set id; random when unset.
    #[arg(long)]
    basis: Option<String>,

    #[arg(long)]
    category: Category,

    #[arg(long)]
    seed: u64,

    #[arg(long = "out-dir")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(&cli.common, args),
        Command::Batch(args) => cmd_batch(&cli.common, args),
        Command::Grid(args) => cmd_grid(&cli.common, args),
        Command::Hand(args) => cmd_hand(&cli.common, args),
        Command::Texture(args) => cmd_texture(&cli.common, args),
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<RenderConfig> {
    let mut cfg = match &common.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(font) = &common.font {
        cfg.font = font.clone();
    }
    if let Some(icons) = &common.icons {
        cfg.icons_dir = icons.clone();
    }
    Ok(cfg)
}

fn load_registry(common: &CommonArgs) -> anyhow::Result<BasisRegistry> {
    match &common.basis_dir {
        Some(dir) => {
            let reg = BasisRegistry::load_dir(dir)?;
            anyhow::ensure!(!reg.is_empty(), "no basis sets in '{}'", dir.display());
            Ok(reg)
        }
        None => {
            let mut reg = BasisRegistry::new();
            reg.insert(BasisSet::rectangle("rectangle", 800.0, 800.0, 64, 64, 32)?)?;
            Ok(reg)
        }
    }
}

fn compositor(common: &CommonArgs) -> anyhow::Result<CardCompositor> {
    let cfg = load_config(common)?;
    let font = cfg.font.clone();
    CardCompositor::from_config(cfg).with_context(|| format!("load font '{}'", font.display()))
}

fn load_deck(path: &Path) -> anyhow::Result<Vec<CardRecord>> {
    model::load_deck(path).with_context(|| format!("load deck '{}'", path.display()))
}

fn cmd_render(common: &CommonArgs, args: RenderArgs) -> anyhow::Result<()> {
    let record = CardRecord::from_json_file(&args.card)
        .with_context(|| format!("load card '{}'", args.card.display()))?;
    let mut compositor = compositor(common)?;

    let art = match (&args.art, args.seed) {
        (Some(path), _) => match decode::load_art(path) {
            Ok(frames) => ArtInput::Frames(Arc::new(frames)),
            Err(e) if e.is_asset_not_found() => {
                tracing::warn!(art = %path.display(), "art not found, rendering without it");
                ArtInput::None
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("load art '{}'", path.display())));
            }
        },
        (None, Some(seed)) => {
            compositor = compositor.with_registry(Arc::new(load_registry(common)?));
            ArtInput::Synthesized {
                basis: args.basis.clone(),
                seed,
            }
        }
        (None, None) => ArtInput::FromRecord,
    };

    let rendered = compositor.render_with_art(&record, &art, &args.out_dir)?;
    if rendered.report.any() {
        eprintln!("warning: text overflowed in {}", rendered.path.display());
    }
    eprintln!("wrote {}", rendered.path.display());
    if let Some(gif) = &rendered.animation {
        eprintln!("wrote {}", gif.display());
    }
    Ok(())
}

fn cmd_batch(common: &CommonArgs, args: BatchArgs) -> anyhow::Result<()> {
    let deck = load_deck(&args.deck)?;
    let compositor = compositor(common)?;
    let mut failed = 0usize;
    for (record, result) in deck.iter().zip(compositor.render_batch(&deck, &args.out_dir)) {
        match result {
            Ok(rendered) => eprintln!("wrote {}", rendered.path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {e}", record.name());
            }
        }
    }
    anyhow::ensure!(failed == 0, "{failed} of {} cards failed", deck.len());
    Ok(())
}

fn write_png(img: &image::RgbaImage, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_grid(common: &CommonArgs, args: GridArgs) -> anyhow::Result<()> {
    let deck = load_deck(&args.deck)?;
    let compositor = compositor(common)?;
    let cache = RenderCache::new(&args.cache_dir);
    let grid = layout::render_grid(&compositor, &cache, &deck, &GridSpec::default())?;
    for &i in &grid.skipped {
        eprintln!("skipped {}", deck[i].name());
    }
    write_png(&grid.image, &args.out)
}

fn cmd_hand(common: &CommonArgs, args: HandArgs) -> anyhow::Result<()> {
    let deck = load_deck(&args.deck)?;
    let compositor = compositor(common)?;
    let cache = RenderCache::new(&args.cache_dir);
    let spec = FanSpec {
        hand_size: args.size,
        spread_deg: args.spread,
        ..FanSpec::default()
    };
    let mut rng = Rng64::new(args.seed);
    let hand = layout::render_fan(&compositor, &cache, &deck, &spec, &mut rng)?;
    write_png(&hand.image, &args.out)
}

fn cmd_texture(common: &CommonArgs, args: TextureArgs) -> anyhow::Result<()> {
    let cfg = load_config(common)?;
    let registry = load_registry(common)?;
    let mut rng = Rng64::new(args.seed);
    let tex = TextureSynthesizer::new(&registry, &cfg.palettes)
        .with_retries(cfg.synth_retries)
        .synthesize(args.basis.as_deref(), args.category, &mut rng)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let stem = format!(
        "{}_{}_{}",
        args.category.as_str(),
        tex.params.basis_id,
        args.seed
    );
    let png = args.out_dir.join(format!("{stem}.png"));
    write_png(&tex.image, &png)?;

    let sidecar = args.out_dir.join(format!("{stem}.json"));
    let f = std::fs::File::create(&sidecar)
        .with_context(|| format!("create '{}'", sidecar.display()))?;
    serde_json::to_writer_pretty(f, &tex.params)?;
    eprintln!("wrote {}", sidecar.display());
    Ok(())
}
