//! Debug script to print a biome map as ASCII

use clap::Parser;

use contrib_diorama::biome::{biome_stats, generate_biomes, BiomeCell};
use contrib_diorama::calendar::{DAYS_PER_WEEK, WEEKS_PER_YEAR};
use contrib_diorama::config::BiomeParams;

#[derive(Parser, Debug)]
#[command(name = "debug_biome")]
#[command(about = "Print the biome map for a seed")]
struct Args {
    /// Biome seed
    #[arg(short, long, default_value = "12345")]
    seed: u64,

    /// Number of weeks
    #[arg(short, long, default_value_t = WEEKS_PER_YEAR)]
    weeks: usize,
}

fn biome_char(cell: &BiomeCell) -> char {
    if cell.is_river {
        '~'
    } else if cell.is_pond {
        'o'
    } else if cell.near_water {
        ','
    } else if cell.forest_density > 0.75 {
        '#'
    } else if cell.forest_density > 0.5 {
        '*'
    } else if cell.forest_density > 0.25 {
        ':'
    } else if cell.forest_density > 0.0 {
        '.'
    } else {
        ' '
    }
}

fn main() {
    let args = Args::parse();
    let params = BiomeParams::default();
    let map = generate_biomes(args.weeks, DAYS_PER_WEEK, args.seed, &params);

    println!("=== BIOME MAP ({}x{}) seed={} ===", args.weeks, DAYS_PER_WEEK, args.seed);
    println!("  ~ = river   o = pond   , = near water   .:*# = forest density");
    println!();

    for day in 0..map.height {
        let line: String = (0..map.width).map(|week| biome_char(map.get(week, day))).collect();
        println!("|{}|", line);
    }

    let stats = biome_stats(&map);
    println!();
    println!(
        "river {}  pond {}  near water {}  forest {}",
        stats.river_cells, stats.pond_cells, stats.near_water_cells, stats.forest_cells
    );
}
