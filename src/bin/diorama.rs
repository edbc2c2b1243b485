use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use diorama::{HeadlessBackend, NavPolicy, PageDeck, Stage, StageOpts};

#[derive(Parser, Debug)]
#[command(name = "diorama", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted headless session and print engine statistics.
    Run(RunArgs),
    /// Print the built-in page deck as JSON.
    Deck(DeckArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Page deck JSON; the built-in deck is used when absent.
    #[arg(long = "deck")]
    deck_path: Option<PathBuf>,

    /// Comma-separated page indices to navigate through.
    #[arg(long, default_value = "2,4,1,5,0")]
    script: String,

    /// Ticks between scripted navigation requests.
    #[arg(long, default_value_t = 240)]
    step_every: u32,

    /// Total ticks to run.
    #[arg(long, default_value_t = 2000)]
    frames: u32,

    /// Simulated tick rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Overlap policy for mid-transition navigation.
    #[arg(long, value_enum, default_value_t = PolicyChoice::QueueLatest)]
    policy: PolicyChoice,

    /// Seed for deterministic particle and light placement.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Optional emblem image for the floating badge.
    #[arg(long)]
    badge: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DeckArgs {
    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    QueueLatest,
    Ignore,
}

impl From<PolicyChoice> for NavPolicy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::QueueLatest => NavPolicy::QueueLatest,
            PolicyChoice::Ignore => NavPolicy::IgnoreWhileInFlight,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Deck(args) => cmd_deck(args),
    }
}

fn read_deck(path: Option<&PathBuf>) -> anyhow::Result<PageDeck> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read deck '{}'", path.display()))?;
            Ok(PageDeck::from_json(&json)?)
        }
        None => Ok(PageDeck::standard()),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be >= 1");
    }
    if args.step_every == 0 {
        anyhow::bail!("--step-every must be >= 1");
    }
    let script: Vec<usize> = args
        .script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<usize>().with_context(|| format!("bad script index '{s}'")))
        .collect::<anyhow::Result<_>>()?;

    let deck = read_deck(args.deck_path.as_ref())?;
    let opts = StageOpts {
        policy: args.policy.into(),
        seed: args.seed,
        badge_texture: args.badge.clone(),
        ..StageOpts::default()
    };
    let mut stage = Stage::new(deck, opts, Box::new(HeadlessBackend::new()))?;
    stage.start();

    let dt = 1.0 / args.fps as f32;
    let mut script_cursor = 0usize;
    for frame in 0..args.frames {
        if frame > 0 && frame % args.step_every == 0 && script_cursor < script.len() {
            let target = script[script_cursor];
            script_cursor += 1;
            let taken = stage.goto_page(target);
            eprintln!(
                "tick {frame}: goto {target} -> {}",
                if taken { "accepted" } else { "refused" }
            );
        }
        stage.advance(frame as f32 * dt);
    }

    let ui = stage.ui().clone();
    eprintln!("-- session --");
    eprintln!("page:       {} ({})", ui.page_index, ui.title);
    eprintln!("progress:   {:.3}", ui.progress);
    eprintln!("in flight:  {}", stage.in_flight());
    let nav = stage.nav_stats();
    eprintln!(
        "navigation: accepted {}, rejected {}, queued {}, dropped {}",
        nav.accepted, nav.rejected, nav.queued, nav.dropped_in_flight
    );
    eprintln!(
        "models:     constructed {}, disposed {}, failed resolutions {}",
        nav.models_constructed, nav.models_disposed, nav.resolutions_failed
    );
    let scene = stage.scene().stats();
    eprintln!(
        "resources:  {} geometries / {} materials live ({} / {} freed)",
        scene.live_geometries, scene.live_materials, scene.geometries_freed, scene.materials_freed
    );
    if let Some(draw) = stage.backend().draw_stats() {
        eprintln!(
            "last frame: {} nodes, {} primitives, {} vertices",
            draw.nodes, draw.primitives, draw.vertices
        );
    }
    eprintln!("render errors: {}", stage.render_failures());

    stage.shutdown();
    let after = stage.scene().stats();
    eprintln!(
        "after shutdown: {} geometries / {} materials live",
        after.live_geometries, after.live_materials
    );
    Ok(())
}

fn cmd_deck(args: DeckArgs) -> anyhow::Result<()> {
    let deck = PageDeck::standard();
    let json = serde_json::to_string_pretty(&deck).context("serialize deck")?;
    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
