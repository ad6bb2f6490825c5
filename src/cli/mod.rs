//! CLI Module
//!
//! Command-line interface for the ravefx demo engine.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::neural::MockConvention;

/// ravefx - demo timbre effects and neural resynthesis
#[derive(Parser, Debug)]
#[command(name = "ravefx-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the demo effect for a model to a mono 16-bit WAV
    #[command(name = "apply")]
    Apply {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Model name or checkpoint path (its file stem is used)
        model: PathBuf,
    },

    /// Resynthesize a WAV through a checkpoint
    #[command(name = "infer")]
    Infer {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (mono 16-bit, 48 kHz)
        output: PathBuf,

        /// Checkpoint file
        model: PathBuf,

        /// Calling convention of the mock runtime
        #[arg(long, value_enum, default_value = "modern")]
        mock: MockConvention,
    },

    /// List catalog models and checkpoints on disk
    #[command(name = "models")]
    Models {
        /// Models directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Write a mono 16-bit sine tone
    #[command(name = "tone")]
    Tone {
        /// Output WAV file
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value_t = 2.0)]
        secs: f32,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        rate: u32,
    },

    /// Empty the upload directory and prune old outputs
    #[command(name = "clean")]
    Clean,
}
