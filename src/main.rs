//! Emberdelve - Entry Point
//!
//! Small preview tool: load a level library, generate one dungeon and
//! print it as colored glyphs together with the generation statistics.

use std::env;

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use emberdelve::config::LevelKind;
use emberdelve::{DungeonBuilder, LevelLibrary, Tile};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage: emberdelve [levels-file] [level-id] [seed]
    let mut args = env::args().skip(1);
    let levels_path = args.next().unwrap_or_else(|| "assets/levels.json".to_string());
    let level_id = args.next().unwrap_or_else(|| "catacombs".to_string());
    let seed: u64 = match args.next() {
        Some(s) => s.parse().context("seed must be an unsigned integer")?,
        None => rand::random(),
    };

    let library = LevelLibrary::load_or_default(&levels_path);
    let level = library
        .get(&level_id)
        .with_context(|| format!("available levels: {:?}", library.ids().collect::<Vec<_>>()))?;

    log::info!("generating `{}` with seed {}", level.name, seed);
    let mut config = level.dungeon.clone();
    if level.kind == LevelKind::Boss {
        config.boss_end = true;
    }
    let mut builder = DungeonBuilder::new(config).with_seed(seed);
    let dungeon = match level.kind {
        LevelKind::Lobby => builder.build_lobby()?,
        LevelKind::Standard | LevelKind::Boss => builder.build()?,
    };

    print_grid(&dungeon);
    print_stats(&dungeon);
    Ok(())
}

fn print_grid(dungeon: &emberdelve::Dungeon) {
    for y in 0..dungeon.grid.height() {
        let mut line = String::new();
        for x in 0..dungeon.grid.width() {
            let tile = dungeon.grid.get(x, y);
            if tile == Tile::Void {
                line.push(' ');
                continue;
            }
            let glyph = tile.glyph().to_string();
            let styled = match tile {
                Tile::Wall(_) => glyph.dark_grey(),
                Tile::Corridor => glyph.dark_yellow(),
                Tile::Door => glyph.yellow(),
                Tile::Portal => glyph.cyan(),
                Tile::Spawn(_) => glyph.red(),
                _ => glyph.grey(),
            };
            line.push_str(&styled.to_string());
        }
        println!("{}", line);
    }
}

fn print_stats(dungeon: &emberdelve::Dungeon) {
    let stats = &dungeon.stats;
    println!();
    println!(
        "seed {}  rooms {}  doors {}  corridor tiles {}",
        dungeon.seed, stats.rooms, stats.doors, stats.corridor_tiles
    );
    for (role, count) in &stats.rooms_by_role {
        println!("  {:>2} x {}", count, role.name());
    }
    if stats.retries > 0 {
        println!("  retries: {}", stats.retries);
    }
    if stats.degraded_routes > 0 {
        println!("  degraded routes: {}", stats.degraded_routes);
    }
    if stats.doorless_rooms > 0 {
        println!("  doorless rooms: {}", stats.doorless_rooms);
    }
    if stats.unreachable_tiles > 0 {
        println!("  UNREACHABLE TILES: {}", stats.unreachable_tiles);
    }
}
