use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use snake_dqn::game::GameConfig;
use snake_dqn::modes::{HumanMode, TrainConfig, TrainMode, WatchMode};
use snake_dqn::rl::{default_device, InferenceBackend, TrainingBackend};

#[derive(Parser)]
#[command(name = "snake_dqn")]
#[command(version, about = "Snake game with a deep Q-learning agent")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width (human and train modes)
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height (human and train modes)
    #[arg(long, default_value = "20")]
    height: usize,

    /// Number of games to train (train mode)
    #[arg(long, default_value = "500")]
    games: usize,

    /// Model path: written on new records in train mode, read in watch mode
    #[arg(long, default_value = "models/snake.mpk")]
    model: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Train the DQN agent headlessly
    Train,
    /// Watch a trained agent play
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig::new(cli.width, cli.height);

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(cli.games, cli.model);
            train_config.game_config = config;
            let mut train_mode =
                TrainMode::<TrainingBackend>::new(train_config, default_device())?;
            train_mode.run()?;
        }
        Mode::Watch => {
            let mut watch_mode =
                WatchMode::<InferenceBackend>::new(&cli.model, default_device())?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
