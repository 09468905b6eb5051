mod variant;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use harness::frame::ROTATION_STEP;
use harness::glutils::VertexBuffer;
use harness::logging::{init_logging, LoggingConfig};
use harness::render::TriangleScene;
use harness::shaders::{ShaderProgram, ShaderSources};
use harness::system::RenderContext;
use harness::HarnessError;
use log::{error, info};
use variant::Variant;

#[derive(Debug, Parser)]
#[command(name = "triangle", about = "Draws a triangle until Escape or window close")]
struct Cli {
    /// Which triangle program to run.
    #[arg(long, value_enum, default_value_t = Variant::Rotating)]
    variant: Variant,

    /// Vertex shader source. Defaults to the variant's bundled shader.
    #[arg(long)]
    vertex: Option<PathBuf>,

    /// Fragment shader source. Defaults to the bundled shader.
    #[arg(long)]
    fragment: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value = "Triangle test")]
    title: String,

    /// Rotation added per frame, in radians.
    #[arg(long, default_value_t = ROTATION_STEP, value_parser = parse_step)]
    step: f64,

    /// Log filter (env_logger syntax). Falls back to RUST_LOG, then "info".
    #[arg(long)]
    log: Option<String>,
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if step > 0.0 && step.is_finite() {
        Ok(step)
    } else {
        Err(format!("step must be a positive number, got {step}"))
    }
}

fn run(cli: &Cli) -> Result<u64, HarnessError> {
    let vertex = cli
        .vertex
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli.variant.vertex_shader()));
    let fragment = cli
        .fragment
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli.variant.fragment_shader()));

    // read before any window exists, so a bad path needs no teardown
    let sources = ShaderSources::load(&vertex, &fragment)?;

    let mut ctx = RenderContext::open(&cli.title, cli.width, cli.height)?;
    let vertices = VertexBuffer::upload(&ctx, cli.variant.vertices())?;
    let program = ShaderProgram::from_sources(&ctx, &sources)?;

    let frames = {
        let mut scene =
            TriangleScene::new(&mut ctx, &program, &vertices, cli.variant.clear_color());
        if let Some(name) = cli.variant.world_uniform() {
            scene = scene.with_world_uniform(name)?;
        }
        cli.variant.frame_loop(cli.step).run(&mut scene)?
    };

    drop(program);
    drop(vertices);
    ctx.close();
    Ok(frames)
}

fn main() {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });
    info!("running {:?} triangle", cli.variant);

    match run(&cli) {
        Ok(frames) => info!("drew {frames} frames"),
        Err(e) => {
            error!("{e}");
            process::exit(e.exit_code());
        }
    }
}
