use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use contrib_diorama::calendar::{Calendar, Grid};
use contrib_diorama::config::RenderConfig;
use contrib_diorama::export;
use contrib_diorama::palette::ColorMode;
use contrib_diorama::render::{render, Diorama, RenderOptions};
use contrib_diorama::seasons::Hemisphere;
use contrib_diorama::seeds::RenderSeeds;
use contrib_diorama::DioramaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Dark,
    Light,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HemisphereArg {
    North,
    South,
}

#[derive(Parser, Debug)]
#[command(name = "contrib_diorama")]
#[command(about = "Render an activity calendar as an isometric terrain diorama")]
struct Args {
    /// Calendar JSON file ({"weeks": [{"days": [{"date", "count"}]}]})
    #[arg(short, long)]
    calendar: PathBuf,

    /// Identity the render is seeded from, usually a username
    #[arg(short, long)]
    user: String,

    /// Colour mode to render
    #[arg(short, long, value_enum, default_value = "both")]
    mode: ModeArg,

    /// Hemisphere the seasons follow
    #[arg(long, value_enum, default_value = "north")]
    hemisphere: HemisphereArg,

    /// Reshuffle decoration looks without moving them
    #[arg(long)]
    variant_seed: Option<u64>,

    /// Render configuration JSON (any subset of fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Log pipeline details
    #[arg(short, long)]
    verbose: bool,
}

fn options_for(args: &Args, mode: ColorMode, config: &RenderConfig) -> RenderOptions {
    let hemisphere = match args.hemisphere {
        HemisphereArg::North => Hemisphere::North,
        HemisphereArg::South => Hemisphere::South,
    };
    let mut options = RenderOptions::for_identity(&args.user, mode)
        .with_hemisphere(hemisphere)
        .with_config(config.clone());
    if let Some(variants) = args.variant_seed {
        let master = options.seeds.master;
        options = options.with_seeds(RenderSeeds::builder(master).variants(variants).build());
    }
    options
}

fn write_render(out: &Path, user: &str, diorama: &Diorama) -> Result<PathBuf, DioramaError> {
    let path = out.join(format!("{}-{}.svg", user, diorama.mode));
    export::write_svg(&diorama.scene, &path)?;
    println!(
        "{}: {} cells, {} decorations, {} landmarks -> {}",
        diorama.mode,
        diorama.cells.len(),
        diorama.decorations.len(),
        diorama.landmarks.len(),
        path.display()
    );
    Ok(path)
}

/// The user name becomes part of a file name, so it must not leave `--out`.
fn check_user(user: &str) -> Result<(), DioramaError> {
    if user.is_empty() || user == "." || user == ".." || user.contains(['/', '\\', '\0']) {
        return Err(DioramaError::invalid(format!("user '{}' is not usable as a file name", user)));
    }
    Ok(())
}

fn run(args: Args) -> Result<(), DioramaError> {
    check_user(&args.user)?;
    let calendar = Calendar::load(&args.calendar)?;
    let grid = Grid::from_weeks(&calendar.weeks);
    if grid.week_count() == 0 {
        return Err(DioramaError::invalid(format!("{} contains no weeks", args.calendar.display())));
    }

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    std::fs::create_dir_all(&args.out)?;

    let stats = grid.stats();
    println!(
        "{} weeks, {} contributions, longest streak {} days, current streak {} days",
        grid.week_count(),
        stats.total,
        stats.longest_streak,
        stats.current_streak
    );

    match args.mode {
        ModeArg::Dark | ModeArg::Light => {
            let mode = if args.mode == ModeArg::Dark { ColorMode::Dark } else { ColorMode::Light };
            let diorama = render(&grid, &options_for(&args, mode, &config));
            write_render(&args.out, &args.user, &diorama)?;
        }
        ModeArg::Both => {
            let dark_options = options_for(&args, ColorMode::Dark, &config);
            let light_options = options_for(&args, ColorMode::Light, &config);
            let (dark, light) = rayon::join(|| render(&grid, &dark_options), || render(&grid, &light_options));
            write_render(&args.out, &args.user, &dark)?;
            write_render(&args.out, &args.user, &light)?;
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
