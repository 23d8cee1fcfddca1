//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the plan command
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Saved `ffprobe -show_format -show_streams -of json` output for the source
    #[arg(short, long)]
    pub probe: String,

    /// Source media path placed in the emitted commands
    #[arg(short, long)]
    pub input: String,

    /// Output file path (default: <input>_clip.<container>)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, 1m30s, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM:SS.ms, MM:SS.ms, 1m30s, or seconds)
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Clip duration, measured from the start
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Output container: mp4, mkv, webm (default: from the output extension, else mp4)
    #[arg(long)]
    pub container: Option<String>,

    /// Video codec: h264, hevc, av1, vp9
    #[arg(long)]
    pub codec: Option<String>,

    /// Encoder: auto or a concrete encoder such as x264, hevc-nvenc, svt-av1
    #[arg(long, default_value = "auto")]
    pub encoder: String,

    /// Output height: original, 2160p, 1440p, 1080p, 720p, 480p
    #[arg(long)]
    pub resolution: Option<String>,

    /// Copy the video stream without re-encoding
    #[arg(long)]
    pub copy_video: bool,

    /// Copy the audio stream without re-encoding
    #[arg(long, conflicts_with = "no_audio")]
    pub copy_audio: bool,

    /// Remove audio streams
    #[arg(long)]
    pub no_audio: bool,

    /// Downmix audio to stereo
    #[arg(long)]
    pub downmix: bool,

    /// Audio bitrate in kbps
    #[arg(long)]
    pub audio_kbps: Option<u32>,

    /// Keep subtitle streams the container can carry
    #[arg(long)]
    pub subs: bool,

    /// Burn the subtitle stream at this index (0 is the first subtitle stream)
    #[arg(long)]
    pub burn: Option<usize>,

    /// Burn method: auto, extract, inline
    #[arg(long)]
    pub burn_method: Option<String>,

    /// Subtitle delay in milliseconds; negative shows them earlier
    #[arg(long, allow_hyphen_values = true)]
    pub sub_delay_ms: Option<i64>,

    /// Target output size in MB
    #[arg(long)]
    pub target_size: Option<f64>,

    /// Directory for pass logs and extracted subtitles (default: system temp)
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Print the plan and commands as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the plan rationale in text output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Saved ffprobe JSON output
    #[arg(short, long)]
    pub probe: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
