use std::fs::File;

use clap::Parser;
use log::info;
use simplelog::WriteLogger;

use snake_engine::config::Args;
use snake_engine::error::AppError;
use snake_engine::game::Game;
use snake_engine::score_store::{FileScoreStore, MemoryScoreStore, ScoreStore};

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = args.game_config()?;

    // The terminal belongs to the game, so logs go to a file.
    WriteLogger::init(
        args.log_level,
        simplelog::Config::default(),
        File::create(&args.log_file)?,
    )?;
    info!("Starting snake");

    let store: Box<dyn ScoreStore> = if args.no_persist {
        Box::new(MemoryScoreStore::new())
    } else {
        Box::new(FileScoreStore::new(&args.scores))
    };

    let mut game = Game::new(&config, store)?;
    game.run()?;

    let session = game.session();
    println!(
        "\nFinal score: {}  Best: {}",
        session.score(),
        session.high_score()
    );
    Ok(())
}
