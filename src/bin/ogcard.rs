use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "ogcard", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card as a PNG.
    Render(RenderArgs),
    /// Render a card for every routable page in a manifest.
    Build(BuildArgs),
    /// Print the loaded font faces with the SHA-256 of their bytes.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Branding JSON (avatar, fonts, optional card design).
    #[arg(long)]
    branding: PathBuf,

    /// Page title; leave empty to promote the description to the headline.
    #[arg(long, default_value = "")]
    title: String,

    /// Page description.
    #[arg(long, default_value = "")]
    description: String,

    /// Badge label, e.g. the section name.
    #[arg(long, default_value = "")]
    breadcrumb: String,

    /// Do not draw the description.
    #[arg(long)]
    hide_description: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Branding JSON (avatar, fonts, optional card design).
    #[arg(long)]
    branding: PathBuf,

    /// Page manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Directory receiving `<slug>.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Also render pages marked as drafts.
    #[arg(long)]
    include_drafts: bool,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Branding JSON (avatar, fonts, optional card design).
    #[arg(long)]
    branding: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Build(args) => cmd_build(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Load branding, install it process-wide and build the renderer it describes.
fn startup(branding: &Path) -> anyhow::Result<(&'static ogcard::BrandingAssets, ogcard::Renderer)> {
    let (config, root) = ogcard::BrandingConfig::from_path(branding)?;
    let assets = ogcard::BrandingAssets::load(&config, &root)
        .with_context(|| format!("load branding assets from '{}'", branding.display()))?;
    let assets = ogcard::global::install(assets)?;
    let renderer = ogcard::Renderer::new(config.card_config())?;
    Ok((assets, renderer))
}

fn write_png(path: &Path, png: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (assets, renderer) = startup(&args.branding)?;
    let meta = ogcard::PageMetadata::new(args.title, args.breadcrumb)
        .with_description(args.description)
        .with_show_description(!args.hide_description);

    let image = renderer.render(&meta, assets)?;
    write_png(&args.out, &image.png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let (assets, renderer) = startup(&args.branding)?;
    let manifest = ogcard::PageManifest::from_path(&args.manifest)?;
    let pages = manifest.routable(args.include_drafts)?;

    // Pages with identical metadata share one render.
    let mut groups: BTreeMap<ogcard::Fingerprint, (&ogcard::PageMetadata, Vec<String>)> =
        BTreeMap::new();
    for (slug, meta) in pages {
        groups
            .entry(meta.fingerprint())
            .or_insert_with(|| (meta, Vec::new()))
            .1
            .push(slug);
    }
    tracing::info!(distinct = groups.len(), "rendering cards");

    let failed: usize = groups
        .par_iter()
        .map(|(fp, (meta, slugs))| {
            let image = match renderer.render(meta, assets) {
                Ok(image) => image,
                Err(e) => {
                    for slug in slugs {
                        tracing::warn!(%slug, error = %e, "skipping page");
                    }
                    return slugs.len();
                }
            };
            let mut failed = 0;
            for slug in slugs {
                let path = args.out_dir.join(format!("{slug}.png"));
                match write_png(&path, &image.png) {
                    Ok(()) => tracing::debug!(%slug, fingerprint = %fp.to_hex(), "card written"),
                    Err(e) => {
                        let error = format!("{e:#}");
                        tracing::warn!(%slug, %error, "skipping page");
                        failed += 1;
                    }
                }
            }
            failed
        })
        .sum();

    let total: usize = groups.values().map(|(_, slugs)| slugs.len()).sum();
    eprintln!(
        "wrote {} of {total} cards to {}",
        total - failed,
        args.out_dir.display()
    );
    if failed > 0 {
        anyhow::bail!("{failed} page(s) failed to render");
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let (config, root) = ogcard::BrandingConfig::from_path(&args.branding)?;
    let assets = ogcard::BrandingAssets::load(&config, &root)?;
    for face in assets.faces() {
        let digest = sha2::Sha256::digest(face.data.as_slice());
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        println!("{}\t{}\t{hex}", face.family, face.weight);
    }
    Ok(())
}
