use anyhow::Context;
use clap::{Parser, ValueEnum};
use sentiscape_core::{
    Engine, EngineConfig, FrameOutcome, SceneHandle, SceneParameters, SceneUpdate, SentimentClass,
};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const FIXED_DT_SEC: f32 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClassArg {
    Negative,
    Neutral,
    Positive,
}

impl From<ClassArg> for SentimentClass {
    fn from(c: ClassArg) -> Self {
        match c {
            ClassArg::Negative => SentimentClass::Negative,
            ClassArg::Neutral => SentimentClass::Neutral,
            ClassArg::Positive => SentimentClass::Positive,
        }
    }
}

/// Renders a sentiment-driven landscape headlessly and writes the last frame as PNG.
#[derive(Debug, Parser)]
#[command(name = "sentiscape-native", version)]
struct Cli {
    #[arg(long, value_enum, default_value = "neutral")]
    class: ClassArg,
    /// Sentiment score in [-1, 1]; out-of-range values are clamped.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    score: f32,
    /// Utterance text; longer text densifies terrain and particles.
    #[arg(long, default_value = "")]
    text: String,
    #[arg(long, default_value_t = 240)]
    frames: u32,
    #[arg(long, default_value_t = 960)]
    width: u32,
    #[arg(long, default_value_t = 540)]
    height: u32,
    #[arg(long, default_value = "frame.png")]
    out: PathBuf,
    /// JSON engine config; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    no_motion: bool,
    #[arg(long)]
    high_intensity: bool,
    /// Push a short sentiment sequence from a background thread while rendering.
    #[arg(long)]
    script: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Stands in for the speech/sentiment pipeline: a producer that never waits
/// on the renderer.
fn spawn_script(handle: SceneHandle) -> thread::JoinHandle<()> {
    let steps: [(SentimentClass, f32, &str); 4] = [
        (SentimentClass::Neutral, 0.1, "okay, let's see"),
        (SentimentClass::Positive, 0.6, "this is lovely"),
        (SentimentClass::Positive, 0.9, "what a wonderful bright morning"),
        (SentimentClass::Negative, -0.7, "but the storm is coming"),
    ];
    thread::spawn(move || {
        for (class, score, text) in steps {
            thread::sleep(Duration::from_millis(40));
            let sent = handle.update(SceneUpdate {
                sentiment_class: Some(class),
                sentiment_score: Some(score),
                text: Some(text.to_owned()),
                ..SceneUpdate::default()
            });
            if !sent {
                log::warn!("[script] engine gone, stopping");
                return;
            }
            log::info!("[script] pushed {} {:+.2}", class.name(), score);
        }
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    let params = SceneParameters::new(cli.class.into(), cli.score)
        .with_text(cli.text.clone())
        .with_motion(!cli.no_motion)
        .with_high_intensity(cli.high_intensity);

    let mut engine = Engine::new(config, params).context("creating engine")?;
    engine.resize(cli.width, cli.height)?;
    engine.start();
    anyhow::ensure!(
        engine.surface().is_some(),
        "cannot render at {}x{}",
        cli.width,
        cli.height
    );

    let script = cli.script.then(|| spawn_script(engine.handle()));

    let mut drawn = 0u32;
    let mut overlay_skips = 0u32;
    let mut slowest_ms = 0.0f32;
    for i in 0..cli.frames {
        match engine.frame(FIXED_DT_SEC) {
            FrameOutcome::Drawn(stats) => {
                drawn += 1;
                overlay_skips += u32::from(!stats.overlay_drawn);
                slowest_ms = slowest_ms.max(stats.elapsed_ms);
            }
            FrameOutcome::Skipped(reason) => log::warn!("frame {i} skipped: {reason:?}"),
        }
    }
    if let Some(script) = script {
        if script.join().is_err() {
            log::warn!("[script] producer thread panicked");
        }
        // apply whatever arrived after the last rendered frame
        engine.frame(FIXED_DT_SEC);
    }

    log::info!(
        "rendered {drawn}/{} frames, {} regenerations, slowest {slowest_ms:.1}ms, overlay skipped {overlay_skips}x",
        cli.frames,
        engine.generation()
    );

    let snap = engine.snapshot().context("no frame was drawn")?;
    let image = image::RgbaImage::from_raw(snap.width, snap.height, snap.rgba)
        .context("snapshot buffer does not match its size")?;
    image
        .save(&cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    log::info!("wrote {}", cli.out.display());

    engine.stop();
    Ok(())
}
