//! Command emission: turns an encode plan into ordered ffmpeg argument lists

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::domain::model::{Container, Encoder, SubtitleFormat};
use crate::domain::plan::{
    AudioAction, EncodePlan, FilterStage, ResolvedBurnMethod, StreamKind, SubtitleBurn,
    SubtitleCodecAction, TonemapMethod, VideoAction, VideoEncode,
};
use crate::domain::rules::ContainerRules;
use crate::utils::{format_timestamp, PathUtils};

pub mod filtergraph;
pub mod flags;

use filtergraph::{BurnRender, VideoFilters};

/// Program the emitted argument lists are meant for
pub const FFMPEG: &str = "ffmpeg";

/// Where the commands read from and write to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitContext {
    pub source: String,
    pub output: String,
    pub scratch_dir: PathBuf,
    /// Unique per plan so concurrent runs never share pass logs
    pub stats_id: String,
}

impl EmitContext {
    pub fn new(
        source: impl Into<String>,
        output: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
        stats_id: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            scratch_dir: scratch_dir.into(),
            stats_id: stats_id.into(),
        }
    }

    fn scratch_path(&self, suffix: &str) -> String {
        self.scratch_dir
            .join(format!("{}{}", self.stats_id, suffix))
            .to_string_lossy()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ExtractSubtitles,
    FirstPass,
    FinalPass,
    Single,
}

/// One ffmpeg invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub stage: Stage,
    pub args: Vec<String>,
}

/// Everything the execution shell needs to run a plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EmittedCommands {
    /// Run in order; stop at the first failure
    pub commands: Vec<CommandSpec>,
    /// Temporary files to delete once the commands finish
    pub artifacts: Vec<PathBuf>,
}

impl EmittedCommands {
    pub fn stages(&self) -> Vec<Stage> {
        self.commands.iter().map(|c| c.stage).collect()
    }

    pub fn command(&self, stage: Stage) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.stage == stage)
    }
}

/// Stateless emitter
#[derive(Debug, Clone, Default)]
pub struct CommandEmitter {
    paths: PathUtils,
}

/// Extracted subtitle file and how it gets burned
struct PreparedBurn {
    render: BurnRender,
    overlay_input: Option<String>,
}

impl CommandEmitter {
    pub fn new() -> Self {
        Self {
            paths: PathUtils::new(),
        }
    }

    /// Emit the ordered command list for a plan
    pub fn emit(&self, plan: &EncodePlan, ctx: &EmitContext) -> EmittedCommands {
        let mut emitted = EmittedCommands::default();

        let encode = match &plan.video {
            VideoAction::Encode(encode) => encode,
            VideoAction::Copy { .. } => {
                let args = self.output_args(plan, ctx, None, None);
                emitted.commands.push(CommandSpec {
                    stage: Stage::Single,
                    args,
                });
                return emitted;
            }
        };

        let prepared = plan
            .subtitles
            .burn
            .as_ref()
            .map(|burn| self.prepare_burn(plan, burn, ctx, &mut emitted));

        let stats_base = ctx.scratch_path(&format!(".{}", encode.encoder.encoder.as_str()));

        if encode.pass_count >= 2 {
            let first = self.output_args(plan, ctx, Some((encode, 1, &stats_base)), prepared.as_ref());
            emitted.commands.push(CommandSpec {
                stage: Stage::FirstPass,
                args: first,
            });
            let final_pass = self.output_args(plan, ctx, Some((encode, 2, &stats_base)), prepared.as_ref());
            emitted.commands.push(CommandSpec {
                stage: Stage::FinalPass,
                args: final_pass,
            });
            emitted.artifacts.extend(
                flags::stats_artifacts(encode.encoder.encoder, &stats_base)
                    .into_iter()
                    .map(PathBuf::from),
            );
        } else {
            let args = self.output_args(plan, ctx, Some((encode, 0, &stats_base)), prepared.as_ref());
            emitted.commands.push(CommandSpec {
                stage: Stage::Single,
                args,
            });
        }

        debug!(
            "Emitted {} command(s), {} artifact(s)",
            emitted.commands.len(),
            emitted.artifacts.len()
        );
        emitted
    }

    /// Queue the extraction command when needed and describe the burn filter
    fn prepare_burn(
        &self,
        plan: &EncodePlan,
        burn: &SubtitleBurn,
        ctx: &EmitContext,
        emitted: &mut EmittedCommands,
    ) -> PreparedBurn {
        match burn.method {
            ResolvedBurnMethod::Inline => {
                let offset = plan.clip_start - burn.delay_ms as f64 / 1000.0;
                PreparedBurn {
                    render: BurnRender::Filter(filtergraph::inline_subtitles(
                        &self.paths.escape_filter_path(&ctx.source),
                        burn.ordinal,
                        offset,
                    )),
                    overlay_input: None,
                }
            }
            ResolvedBurnMethod::Extract => {
                let (extension, codec) = match burn.format {
                    SubtitleFormat::StyledText => ("ass", "ass"),
                    SubtitleFormat::PlainText => ("srt", "srt"),
                    SubtitleFormat::Graphic => ("mks", "copy"),
                };
                let path = ctx.scratch_path(&format!(".sub.{}", extension));

                let mut args = vec!["-y".to_string()];
                if burn.delay_ms != 0 {
                    args.push("-itsoffset".to_string());
                    args.push(format!("{:.3}", burn.delay_ms as f64 / 1000.0));
                }
                if plan.trimmed && plan.clip_start > 0.0 {
                    args.push("-ss".to_string());
                    args.push(format_timestamp(plan.clip_start));
                }
                args.push("-i".to_string());
                args.push(ctx.source.clone());
                if plan.trimmed && plan.clip_start > 0.0 {
                    args.push("-ss".to_string());
                    args.push("0".to_string());
                }
                if plan.trimmed {
                    args.push("-t".to_string());
                    args.push(format_timestamp(plan.clip_duration()));
                }
                args.extend([
                    "-map".to_string(),
                    format!("0:s:{}", burn.ordinal),
                    "-c:s".to_string(),
                    codec.to_string(),
                    path.clone(),
                ]);

                emitted.commands.push(CommandSpec {
                    stage: Stage::ExtractSubtitles,
                    args,
                });
                emitted.artifacts.push(PathBuf::from(&path));

                if burn.format == SubtitleFormat::Graphic {
                    PreparedBurn {
                        render: BurnRender::Overlay,
                        overlay_input: Some(path),
                    }
                } else {
                    PreparedBurn {
                        render: BurnRender::Filter(filtergraph::extracted_subtitles(
                            &self.paths.escape_filter_path(&path),
                        )),
                        overlay_input: None,
                    }
                }
            }
        }
    }

    /// Build one ffmpeg invocation. `pass` is `(encode, pass number, stats base)`
    /// with pass 0 meaning single pass; `None` copies video.
    fn output_args(
        &self,
        plan: &EncodePlan,
        ctx: &EmitContext,
        pass: Option<(&VideoEncode, u8, &str)>,
        burn: Option<&PreparedBurn>,
    ) -> Vec<String> {
        let first_pass = matches!(pass, Some((_, 1, _)));
        let mut args: Vec<String> = to_strings(flags::GLOBAL_FLAGS);

        if let Some((encode, _, _)) = pass {
            let libplacebo = encode.filters.iter().any(|f| {
                matches!(
                    f,
                    FilterStage::Tonemap {
                        method: TonemapMethod::Libplacebo
                    }
                )
            });
            if libplacebo {
                args.extend(to_strings(flags::TONEMAP_HW_DEVICE));
            }
        }

        let (pre_trim, post_trim) = self.trim_args(plan);
        args.extend(pre_trim);
        args.push("-i".to_string());
        args.push(ctx.source.clone());
        args.extend(post_trim);
        if let Some(input) = burn.and_then(|b| b.overlay_input.as_ref()) {
            args.push("-i".to_string());
            args.push(input.clone());
        }

        let video_index = plan
            .mapping
            .iter()
            .find(|m| m.kind == StreamKind::Video)
            .map(|m| m.source_index)
            .unwrap_or(0);

        match pass {
            None => {
                args.extend(["-map".to_string(), format!("0:{}", video_index)]);
                args.extend(["-c:v".to_string(), "copy".to_string()]);
            }
            Some((encode, pass_number, stats_base)) => {
                let filters = filtergraph::render(
                    &encode.filters,
                    video_index,
                    burn.map(|b| &b.render),
                );
                match filters {
                    VideoFilters::Complex(graph) => {
                        args.extend(["-filter_complex".to_string(), graph]);
                        args.extend(["-map".to_string(), "[vout]".to_string()]);
                    }
                    VideoFilters::Chain(chain) => {
                        args.extend(["-map".to_string(), format!("0:{}", video_index)]);
                        args.extend(["-vf".to_string(), chain]);
                    }
                    VideoFilters::None => {
                        args.extend(["-map".to_string(), format!("0:{}", video_index)]);
                    }
                }

                let encoder = encode.encoder.encoder;
                args.extend(["-c:v".to_string(), encoder.ffmpeg_name().to_string()]);
                args.extend(flags::rate_flags(encoder, encode.target_bitrate_kbps));
                args.extend(flags::encoder_flags(encoder).into_iter().map(String::from));
                args.extend(to_strings(flags::PIX_FMT));
                if pass_number > 0 {
                    args.extend(flags::pass_flags(
                        encoder,
                        pass_number,
                        stats_base,
                        encode.target_bitrate_kbps,
                    ));
                } else if flags::uses_x265_params(encoder) {
                    args.extend([
                        "-x265-params".to_string(),
                        format!(
                            "vbv-maxrate={}:vbv-bufsize={}",
                            encode.target_bitrate_kbps,
                            encode.target_bitrate_kbps * flags::BUFSIZE_MULTIPLIER
                        ),
                    ]);
                }
            }
        }

        if first_pass {
            args.push(flags::NO_AUDIO.to_string());
            args.push(flags::NO_SUBTITLES.to_string());
            args.extend(to_strings(flags::NULL_OUTPUT));
            return args;
        }

        args.extend(self.audio_args(plan));
        args.extend(self.subtitle_args(plan));
        args.extend(self.mux_args(plan, pass.map(|(e, _, _)| e.encoder.encoder)));

        args.push(ctx.output.clone());
        args
    }

    /// Seek flags before and after the input
    fn trim_args(&self, plan: &EncodePlan) -> (Vec<String>, Vec<String>) {
        let mut pre = Vec::new();
        let mut post = Vec::new();
        if !plan.trimmed {
            return (pre, post);
        }

        let start = plan.clip_start > 0.0;
        let duration = format_timestamp(plan.clip_duration());

        if plan.copies_any_stream() {
            if start {
                pre.extend([
                    "-noaccurate_seek".to_string(),
                    "-ss".to_string(),
                    format_timestamp(plan.clip_start),
                ]);
            }
            post.extend(["-t".to_string(), duration]);
        } else {
            if start {
                pre.extend(["-ss".to_string(), format_timestamp(plan.clip_start)]);
            }
            pre.extend(["-t".to_string(), duration]);
        }
        (pre, post)
    }

    fn audio_args(&self, plan: &EncodePlan) -> Vec<String> {
        let audio_index = plan
            .mapping
            .iter()
            .find(|m| m.kind == StreamKind::Audio)
            .map(|m| m.source_index);

        match (plan.audio, audio_index) {
            (AudioAction::Drop, _) | (_, None) => vec![flags::NO_AUDIO.to_string()],
            (AudioAction::Copy { .. }, Some(index)) => vec![
                "-map".to_string(),
                format!("0:{}", index),
                "-c:a".to_string(),
                "copy".to_string(),
            ],
            (
                AudioAction::Encode {
                    codec,
                    bitrate_kbps,
                    channels,
                },
                Some(index),
            ) => {
                let mut args = vec![
                    "-map".to_string(),
                    format!("0:{}", index),
                    "-c:a".to_string(),
                    codec.ffmpeg_name().to_string(),
                ];
                if let Some(channels) = channels {
                    args.extend(["-ac".to_string(), channels.to_string()]);
                }
                args.extend(["-b:a".to_string(), format!("{}k", bitrate_kbps)]);
                args
            }
        }
    }

    fn subtitle_args(&self, plan: &EncodePlan) -> Vec<String> {
        let mut args = Vec::new();
        for slot in plan.mapping.iter().filter(|m| m.kind == StreamKind::Subtitle) {
            args.extend(["-map".to_string(), format!("0:{}", slot.source_index)]);
        }
        if let Some(codec) = plan.subtitles.mux_codec.filter(|_| !args.is_empty()) {
            args.extend([
                "-c:s".to_string(),
                match codec {
                    SubtitleCodecAction::Copy => "copy",
                    SubtitleCodecAction::MovText => "mov_text",
                }
                .to_string(),
            ]);
        }
        args
    }

    fn mux_args(&self, plan: &EncodePlan, encoder: Option<Encoder>) -> Vec<String> {
        let mut args = Vec::new();

        let codec = match (&plan.video, encoder) {
            (_, Some(encoder)) => Some(encoder.codec()),
            (VideoAction::Copy { source_codec }, None) => *source_codec,
            (VideoAction::Encode(e), None) => Some(e.encoder.encoder.codec()),
        };

        if plan.container == Container::Mp4 {
            args.extend(to_strings(flags::FASTSTART));
            if let Some(tag) = codec.and_then(|c| ContainerRules::video_tag(plan.container, c)) {
                args.extend(["-tag:v".to_string(), tag.to_string()]);
            }
        }
        if plan.trimmed {
            args.extend(to_strings(flags::DROP_CHAPTERS));
        }
        if plan.copies_any_stream() && !plan.trimmed {
            args.extend(to_strings(flags::PASSTHROUGH));
        }
        args
    }
}

fn to_strings(flags: &[&str]) -> Vec<String> {
    flags.iter().map(|f| f.to_string()).collect()
}

/// Scratch directory fallback when none is configured
pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}
