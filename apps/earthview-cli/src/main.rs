use anyhow::Context;
use clap::{Parser, Subcommand};
use earthview_input::{InputEvent, on_scroll};
use earthview_render::{DebugTextRenderer, Renderer};
use earthview_scene::{Scene, Viewer, ViewerConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "earthview-cli", about = "Headless tool for earthview operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and default scene settings
    Info,
    /// Feed a JSON array of input events through a viewer
    Replay {
        /// File holding the events
        events: PathBuf,
        /// Print the scene after every event, not just the last
        #[arg(short, long)]
        trace: bool,
        /// Viewport width
        #[arg(long, default_value = "1280")]
        width: u32,
        /// Viewport height
        #[arg(long, default_value = "720")]
        height: u32,
    },
    /// Print the scroll mapping for an offset
    Scroll {
        /// Vertical scroll offset in pixels
        offset: f32,
    },
    /// Load a glTF model and print mesh statistics
    Inspect {
        /// Path to a .gltf or .glb file
        model: PathBuf,
    },
}

fn read_events(path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let events = serde_json::from_reader(file)
        .with_context(|| format!("parsing events from {}", path.display()))?;
    Ok(events)
}

/// Run events through a viewer with a placeholder model attached.
///
/// Rejected events are reported and skipped.
fn replay(
    events: &[InputEvent],
    width: u32,
    height: u32,
    mut on_step: impl FnMut(usize, &InputEvent, &Scene),
) -> anyhow::Result<Viewer> {
    let mut viewer = Viewer::new(&ViewerConfig::default(), width, height)?;
    viewer.attach_model("placeholder");

    for (i, event) in events.iter().enumerate() {
        if let Err(e) = viewer.handle(*event) {
            tracing::warn!(step = i, "event rejected: {e}");
            continue;
        }
        on_step(i, event, viewer.scene());
    }
    Ok(viewer)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("earthview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", earthview_input::crate_info());
            println!("scene: {}", earthview_scene::crate_info());
            println!("assets: {}", earthview_assets::crate_info());
            println!("render: {}", earthview_render::crate_info());
            let config = ViewerConfig::default();
            println!("model: {}", config.model_path.display());
            println!("sensitivity: {}", config.input.sensitivity);
            print!("{}", DebugTextRenderer::new().render(&Scene::new(config.caption)));
        }
        Commands::Replay {
            events,
            trace,
            width,
            height,
        } => {
            let events = read_events(&events)?;
            let renderer = DebugTextRenderer::new();
            println!("Replaying {} events", events.len());

            let viewer = replay(&events, width, height, |i, event, scene| {
                if trace {
                    println!("--- [{i}] {event:?}");
                    print!("{}", renderer.render(scene));
                }
            })?;

            if !trace {
                print!("{}", renderer.render(viewer.scene()));
            }
        }
        Commands::Scroll { offset } => {
            let s = on_scroll(offset);
            println!(
                "scroll_value={} horizontal_offset={} text_visible={}",
                s.scroll_value, s.horizontal_offset, s.text_visible
            );
        }
        Commands::Inspect { model } => {
            let mesh = earthview_assets::load_model(&model)?;
            println!("Model: {}", mesh.name);
            println!("Vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Parts: {}", mesh.parts.len());
            for (i, texture) in mesh.textures.iter().enumerate() {
                println!("Texture {i}: {}x{}", texture.width, texture.height);
            }
            if let Some((lo, hi)) = mesh.bounds() {
                println!(
                    "Bounds: min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
                    lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
                );
            }
        }
    }

    Ok(())
}
