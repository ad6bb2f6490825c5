//! Audio Engine Module
//!
//! - Waveform buffer
//! - PCM container I/O
//! - File-level demo processing with fallback copy

pub mod buffer;
pub mod io;
pub mod processor;

pub use buffer::{downmix, linear_to_db, Waveform};
pub use io::{
    decode_mono, encode_mono, generate_test_tone, read_as_f32, read_pcm16, resample_linear,
    write_pcm16, write_test_tone, PcmSpec,
};
pub use processor::{model_name_from_path, process_file, sha256_file, ProcessOutcome, ProcessReport};
