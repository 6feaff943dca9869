//=========================================================================
// World Tour - Demo Host
//=========================================================================
//
// Loads an asset manifest, registers three showcase worlds and opens the
// window. Press N to move to the next world.
//
//=========================================================================

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::{Quat, Vec3};
use tracing_subscriber::EnvFilter;
use world_tour::core::scene::{NodeId, SceneNode};
use world_tour::prelude::*;

const CONTROLLER_MODEL: &str = "controller";
const CONTROLLER_TEXTURE: &str = "controller-texture";

#[derive(Parser)]
#[command(name = "world-tour", about = "Walk through a series of worlds")]
struct Cli {
    /// Directory asset paths are resolved against
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// JSON asset manifest (defaults to <assets>/manifest.json when present)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Number of loader worker threads
    #[arg(long, default_value = "4")]
    workers: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

//=== Showcase World ======================================================

/// One spinning centerpiece placed in front of a fixed viewpoint.
struct ShowcaseWorld {
    name: &'static str,
    viewpoint: Vec3,
    spin: f32,
    content: Option<SceneNode>,
    attached: Option<NodeId>,
}

impl ShowcaseWorld {
    fn new(name: &'static str, viewpoint: Vec3, spin: f32) -> Self {
        Self {
            name,
            viewpoint,
            spin,
            content: None,
            attached: None,
        }
    }
}

impl World for ShowcaseWorld {
    fn name(&self) -> &str {
        self.name
    }

    fn setup(&mut self, ctx: &mut SharedContext) {
        let mut node = ctx
            .scene_mut()
            .create_node(self.name, "centerpiece")
            .with_position(self.viewpoint - Vec3::new(0.0, 0.4, 2.0));

        if ctx.assets().contains(self.name) {
            node = node.with_asset(self.name);
        }
        self.content = Some(node);
    }

    fn enter(&mut self, ctx: &mut SharedContext) {
        if let Some(node) = self.content.take() {
            let target = node.position;
            self.attached = Some(ctx.scene_mut().attach(node));

            let camera = ctx.camera_mut();
            camera.position = self.viewpoint;
            camera.look_at(target);
        }
    }

    fn exit(&mut self, ctx: &mut SharedContext) {
        if let Some(id) = self.attached.take() {
            self.content = ctx.scene_mut().detach(id);
        }
    }

    fn execute(&mut self, ctx: &mut SharedContext, _delta: f32, elapsed: f32) -> anyhow::Result<()> {
        let id = self.attached.context("centerpiece is not attached")?;
        let node = ctx
            .scene_mut()
            .get_mut(id)
            .context("centerpiece vanished from the scene")?;
        node.rotation = Quat::from_rotation_y(elapsed * self.spin);
        Ok(())
    }
}

//=== Entry Point =========================================================

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let manifest = cli
        .manifest
        .clone()
        .unwrap_or_else(|| cli.assets.join("manifest.json"));
    let assets = if manifest.is_file() {
        AssetTable::from_manifest_file(&manifest)
            .with_context(|| format!("reading manifest {}", manifest.display()))?
    } else {
        AssetTable::new()
    };

    let mut builder = EngineBuilder::new()
        .with_asset_base(&cli.assets)
        .with_loader_workers(cli.workers.max(1));
    if assets.contains(CONTROLLER_MODEL) && assets.contains(CONTROLLER_TEXTURE) {
        builder = builder.with_controller_assets(CONTROLLER_MODEL, CONTROLLER_TEXTURE);
    }

    builder
        .with_assets(assets)
        .build()
        .init(|worlds| {
            worlds.register(ShowcaseWorld::new("lobby", Vec3::new(0.0, 1.6, 3.0), 0.5));
            worlds.register(ShowcaseWorld::new("gallery", Vec3::new(10.0, 1.6, 0.0), 1.0));
            worlds.register(ShowcaseWorld::new("panorama", Vec3::new(-10.0, 2.5, 0.0), 0.2));
        })
        .run()?;

    Ok(())
}
