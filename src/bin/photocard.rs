use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use photocard::Template as _;

#[derive(Parser, Debug)]
#[command(name = "photocard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available templates.
    Templates,
    /// Compose three photos into a card and export it as PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Template id (see `photocard templates`).
    #[arg(long, default_value = "classic")]
    template: String,

    /// Composer configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the export is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Convert the photos to grayscale before compositing.
    #[arg(long)]
    grayscale: bool,

    /// Also write the preview surface to this PNG path.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// The three photos, in slot order.
    #[arg(num_args = 3, required = true)]
    photos: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Templates => cmd_templates(),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn cmd_templates() -> anyhow::Result<()> {
    for t in photocard::TemplateRegistry::builtin().iter() {
        println!("{}\t{}", t.id(), t.name());
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => photocard::ComposerConfig::from_path(path)?,
        None => photocard::ComposerConfig::default(),
    }
    .with_env();
    if args.grayscale {
        config.post_filter = photocard::PostFilter::Grayscale;
    }

    let mut session =
        photocard::PhotoboothSession::new(config, photocard::TemplateRegistry::builtin())?;

    for path in &args.photos {
        let file = photocard::UploadedFile::from_path(path)?;
        match session.upload(file)? {
            photocard::UploadOutcome::Filled { slot, .. } => {
                tracing::info!(%slot, path = %path.display(), "photo loaded");
            }
            photocard::UploadOutcome::Ignored => {
                anyhow::bail!("'{}' is not an image", path.display());
            }
        }
    }

    session.select_template(&args.template)?;
    session.compose()?;

    if let Some(preview) = &args.preview {
        write_preview(session.preview(), preview)?;
    }

    let mut sink = photocard::DirSink::new(&args.out_dir);
    session.export(&mut sink)?;
    for path in sink.written() {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn write_preview(surface: &photocard::Surface, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create preview dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &surface.to_rgba8_straight(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write preview '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
