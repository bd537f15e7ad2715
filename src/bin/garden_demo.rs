//! Headless garden runner
//!
//! Plants trees, runs the animation loop against a recording canvas and
//! writes the final frame's draw commands as JSON.
//!
//! Usage:
//!     garden_demo [OPTIONS]
//!
//! Options:
//!     -c, --config <FILE>     Load a garden config (JSON)
//!     -n, --trees <N>         Random trees to plant (default: 8)
//!     -t, --ticks <N>         Animation ticks to run (default: 400)
//!     --seed <SEED>           Garden seed (overrides config)
//!     --theme <NAME>          Theme: warm, cool, mono, sunset, aurora
//!     --style <STYLE>         Plant every tree with this style
//!     --text <DESC>           Plant a tree from a sound description (repeatable)
//!     --simulate              Feed a simulated microphone with auto-planting
//!     --realtime              Sleep between ticks instead of simulating time
//!     -o, --output <FILE>     Write the last frame as JSON
//!     --save-config <FILE>    Write the effective config and exit
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use echo_garden::audio::{FeatureSource, SimulatedSource};
use echo_garden::canvas::RecordingCanvas;
use echo_garden::core::{Vec2, logging};
use echo_garden::garden::{AnimationDriver, AutoPlanter, Garden, GardenConfig};
use echo_garden::tree::TreeStyle;

fn print_help() {
    eprintln!("garden_demo - Headless Echo Garden runner");
    eprintln!();
    eprintln!("Usage: garden_demo [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -c, --config <FILE>     Load a garden config (JSON)");
    eprintln!("    -n, --trees <N>         Random trees to plant (default: 8)");
    eprintln!("    -t, --ticks <N>         Animation ticks to run (default: 400)");
    eprintln!("    --seed <SEED>           Garden seed (overrides config)");
    eprintln!("    --theme <NAME>          Theme: warm, cool, mono, sunset, aurora");
    eprintln!("    --style <STYLE>         Plant every tree with this style");
    eprintln!("    --text <DESC>           Plant a tree from a sound description (repeatable)");
    eprintln!("    --simulate              Feed a simulated microphone with auto-planting");
    eprintln!("    --realtime              Sleep between ticks instead of simulating time");
    eprintln!("    -o, --output <FILE>     Write the last frame as JSON");
    eprintln!("    --save-config <FILE>    Write the effective config and exit");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    garden_demo -n 12 --theme aurora -o frame.json");
    eprintln!("    garden_demo --text \"loud deep rhythmic\" --style weeping");
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    trees: u32,
    ticks: u64,
    seed: Option<u64>,
    theme: Option<String>,
    style: Option<TreeStyle>,
    texts: Vec<String>,
    simulate: bool,
    realtime: bool,
    output: Option<PathBuf>,
    save_config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut parsed = Args {
        config: None,
        trees: 8,
        ticks: 400,
        seed: None,
        theme: None,
        style: None,
        texts: Vec::new(),
        simulate: false,
        realtime: false,
        output: None,
        save_config: None,
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || -> Result<String, String> {
            i += 1;
            args.get(i).cloned().ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "-n" | "--trees" => {
                parsed.trees = value()?.parse().map_err(|_| "Invalid tree count".to_string())?;
            }
            "-t" | "--ticks" => {
                parsed.ticks = value()?.parse().map_err(|_| "Invalid tick count".to_string())?;
            }
            "--seed" => {
                parsed.seed = Some(value()?.parse().map_err(|_| "Invalid seed".to_string())?);
            }
            "--theme" => parsed.theme = Some(value()?),
            "--style" => {
                parsed.style = Some(value()?.parse().map_err(|e| format!("{}", e))?);
            }
            "--text" => parsed.texts.push(value()?),
            "--simulate" => parsed.simulate = true,
            "--realtime" => parsed.realtime = true,
            "-o" | "--output" => parsed.output = Some(PathBuf::from(value()?)),
            "--save-config" => parsed.save_config = Some(PathBuf::from(value()?)),
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

fn run(args: Args) -> echo_garden::core::Result<()> {
    let mut config = match &args.config {
        Some(path) => GardenConfig::load(path)?,
        None => GardenConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    if let Some(path) = &args.save_config {
        config.save(path)?;
        return Ok(());
    }

    let interval = config.tick_interval();
    let mut garden = Garden::new(config)?;

    let area = garden.plant_area();
    for i in 0..args.trees {
        match args.style {
            Some(style) => {
                let x = area.min.x + area.size().x * (i as f32 + 1.0) / (args.trees as f32 + 1.0);
                garden.plant_styled(Vec2::new(x, area.max.y - 100.0), style, None);
            }
            None => {
                garden.plant_random();
            }
        }
    }
    let width = garden.config().canvas_width;
    for (i, text) in args.texts.iter().enumerate() {
        let x = width * (i as f32 + 1.0) / (args.texts.len() as f32 + 1.0);
        let id = garden.plant_from_text(Vec2::new(x, 480.0), text);
        if let Some(tree) = garden.tree(id) {
            log::info!("'{}' -> {}", text, tree.sound_code());
        }
    }

    let mut canvas = RecordingCanvas::new();
    let mut source = args.simulate.then(|| SimulatedSource::new(garden.config().seed));
    let mut planter = AutoPlanter::new();

    let start = Instant::now();
    let mut driver = AnimationDriver::starting_at(interval, start);
    let mut now = start;
    let mut last_report = None;

    for tick in 0..args.ticks {
        if args.realtime {
            driver.wait_for_next_tick();
            now = Instant::now();
        } else {
            now += interval;
        }

        let live = source.as_mut().and_then(|s| s.next_features());
        if let Some(features) = &live {
            let secs = now.duration_since(start).as_secs_f64();
            planter.check(&mut garden, secs, features);
        }

        let report = driver.tick_at(&mut garden, &mut canvas, now, live.as_ref())?;
        if tick % 100 == 0 {
            log::info!(
                "Tick {}: {} trees, {} grass, {} segments",
                report.tick, report.trees, report.grass, report.stats.segments
            );
        }
        last_report = Some(report);
    }

    if let Some(report) = last_report {
        let mature = garden.trees().iter().filter(|t| !t.is_growing()).count();
        log::info!(
            "Finished after {:.1}s simulated: {} trees ({} mature), {} draw commands",
            report.tick as f32 * interval.as_secs_f32(),
            report.trees,
            mature,
            canvas.len()
        );
    }

    if let Some(path) = &args.output {
        std::fs::write(path, canvas.to_json()?)?;
        log::info!("Wrote frame to {}", path.display());
    }

    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    log::debug!("Done in {:?}", started.elapsed());
}
