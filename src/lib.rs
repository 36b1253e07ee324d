//! Snake DQN - a Snake game with a deep Q-learning agent
//!
//! This library provides:
//! - Core game logic (game module)
//! - DQN training infrastructure (rl module)
//! - TUI rendering (render module)
//! - Keyboard input mapping (input module)
//! - Training and session metrics (metrics module)
//! - Execution modes: human play, headless training, agent playback (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
