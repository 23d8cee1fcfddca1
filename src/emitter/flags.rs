//! ffmpeg flag vocabulary

use crate::domain::model::Encoder;

/// Overwrite output and let ffmpeg pick a hardware decoder
pub const GLOBAL_FLAGS: &[&str] = &["-y", "-hwaccel", "auto"];

/// Vulkan device needed by libplacebo
pub const TONEMAP_HW_DEVICE: &[&str] = &["-init_hw_device", "vulkan"];

pub const PIX_FMT: &[&str] = &["-pix_fmt", "yuv420p"];

pub const FASTSTART: &[&str] = &["-movflags", "+faststart"];

/// Chapters from the full source point past the end of a trimmed clip
pub const DROP_CHAPTERS: &[&str] = &["-map_chapters", "-1"];

/// Keeps timestamps stable when stream copying without a trim
pub const PASSTHROUGH: &[&str] = &[
    "-avoid_negative_ts",
    "make_zero",
    "-muxpreload",
    "0",
    "-muxdelay",
    "0",
    "-copytb",
    "1",
];

pub const NO_AUDIO: &str = "-an";
pub const NO_SUBTITLES: &str = "-sn";

/// Discard the first pass output
pub const NULL_OUTPUT: &[&str] = &["-f", "null", "-"];

const PRESET_SLOW: &[&str] = &["-preset", "slow"];
const PROFILE_HIGH: &[&str] = &["-profile:v", "high"];
const PROFILE_MAIN: &[&str] = &["-profile:v", "main"];

const NVENC_QUALITY: &[&str] = &[
    "-preset",
    "p6",
    "-tune:v",
    "hq",
    "-rc:v",
    "vbr",
    "-multipass",
    "fullres",
    "-rc-lookahead",
    "20",
    "-spatial-aq",
    "1",
    "-temporal-aq",
    "1",
    "-aq-strength",
    "8",
    "-b_ref_mode",
    "middle",
];

const SVT_AV1_QUALITY: &[&str] = &["-preset", "6"];
const VP9_QUALITY: &[&str] = &["-deadline", "good", "-cpu-used", "2", "-row-mt", "1"];

/// Maximum rate equals the target; the buffer holds two seconds of it
pub const BUFSIZE_MULTIPLIER: u64 = 2;

/// Per-encoder quality flags
pub fn encoder_flags(encoder: Encoder) -> Vec<&'static str> {
    match encoder {
        Encoder::X264 => [PRESET_SLOW, PROFILE_HIGH].concat(),
        Encoder::X265 => PRESET_SLOW.to_vec(),
        Encoder::H264Nvenc => [NVENC_QUALITY, PROFILE_HIGH].concat(),
        Encoder::HevcNvenc => [NVENC_QUALITY, PROFILE_MAIN].concat(),
        Encoder::SvtAv1 => SVT_AV1_QUALITY.to_vec(),
        Encoder::Vp9 => VP9_QUALITY.to_vec(),
    }
}

/// x265 takes rate control inside `-x265-params` rather than as ffmpeg flags
pub fn uses_x265_params(encoder: Encoder) -> bool {
    matches!(encoder, Encoder::X265)
}

/// Rate control flags: bitrate, peak rate and VBV buffer
pub fn rate_flags(encoder: Encoder, kbps: u64) -> Vec<String> {
    let mut args = vec!["-b:v".to_string(), format!("{}k", kbps)];
    if !uses_x265_params(encoder) {
        args.extend([
            "-maxrate".to_string(),
            format!("{}k", kbps),
            "-bufsize".to_string(),
            format!("{}k", kbps * BUFSIZE_MULTIPLIER),
        ]);
    }
    args
}

/// Two-pass flags sharing the stats file at `stats_base`
pub fn pass_flags(encoder: Encoder, pass: u8, stats_base: &str, kbps: u64) -> Vec<String> {
    if uses_x265_params(encoder) {
        vec![
            "-x265-params".to_string(),
            format!(
                "pass={}:stats={}:vbv-maxrate={}:vbv-bufsize={}",
                pass,
                stats_base,
                kbps,
                kbps * BUFSIZE_MULTIPLIER
            ),
        ]
    } else {
        vec![
            "-pass".to_string(),
            pass.to_string(),
            "-passlogfile".to_string(),
            stats_base.to_string(),
        ]
    }
}

/// Files the encoder leaves behind for a stats base
pub fn stats_artifacts(encoder: Encoder, stats_base: &str) -> Vec<String> {
    match encoder {
        Encoder::X265 => vec![stats_base.to_string(), format!("{}.cutree", stats_base)],
        Encoder::X264 => vec![
            format!("{}-0.log", stats_base),
            format!("{}-0.log.mbtree", stats_base),
        ],
        _ => vec![format!("{}-0.log", stats_base)],
    }
}
