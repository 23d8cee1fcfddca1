//! Command implementations

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, InspectFormat, InspectRequest, PlanRequest, PlanResponse};
use crate::cli::args::{InspectArgs, PlanArgs};
use crate::domain::errors::OptionsError;
use crate::domain::model::{Container, EncoderPreference, Resolution, VideoCodec};
use crate::domain::options::{
    AudioOptions, BurnMethod, Options, RuntimeFlags, SubtitleOptions, TimeSelection, VideoOptions,
};
use crate::emitter::FFMPEG;
use crate::error::ClipPlanResult;
use crate::utils::{shell_join, PathUtils, TimeParser};

/// Execute the plan command
pub fn plan(args: PlanArgs, container: &dyn AppContainer) -> Result<()> {
    info!("Starting plan operation");
    info!("Probe: {}", args.probe);
    info!("Input: {}", args.input);

    let options = build_options(&args).context("Invalid plan options")?;

    let mut request = PlanRequest::new(args.probe.clone(), args.input.clone(), options);
    if let Some(output) = &args.output {
        request = request.with_output(output.clone());
    }
    if let Some(dir) = &args.scratch_dir {
        request = request.with_scratch_dir(dir.clone());
    }

    let response = container
        .plan_interactor()
        .execute(request)
        .context("Failed to build encode plan")?;

    if args.json {
        let json = serde_json::to_string_pretty(&response)
            .context("Failed to serialize plan to JSON")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&response, args.verbose > 0));
    }

    info!("Plan operation completed successfully");
    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs, container: &dyn AppContainer) -> Result<()> {
    info!("Starting inspect operation");

    let format = if args.json {
        InspectFormat::Json
    } else {
        InspectFormat::Text
    };
    let response = container
        .inspect_interactor()
        .execute(InspectRequest::with_format(args.probe, format))
        .context("Failed to inspect probe output")?;

    println!("{}", response.summary.trim_end());
    Ok(())
}

/// Translate parsed arguments into validated planner options
pub fn build_options(args: &PlanArgs) -> ClipPlanResult<Options> {
    let parser = TimeParser::new();
    let time = |value: &Option<String>| -> ClipPlanResult<Option<f64>> {
        value.as_deref().map(|t| parser.parse_time(t)).transpose()
    };

    let options = Options {
        time: TimeSelection::new(time(&args.start)?, time(&args.end)?, time(&args.duration)?),
        container: resolve_container(args.container.as_deref(), args.output.as_deref())?,
        video: VideoOptions {
            copy: args.copy_video,
            codec: args.codec.as_deref().map(str::parse::<VideoCodec>).transpose()?,
            encoder: args.encoder.parse::<EncoderPreference>()?,
            resolution: args
                .resolution
                .as_deref()
                .map(str::parse::<Resolution>)
                .transpose()?,
        },
        audio: AudioOptions {
            include: !args.no_audio,
            copy: args.copy_audio,
            downmix_to_stereo: args.downmix,
            kbps: args.audio_kbps,
        },
        subtitles: SubtitleOptions {
            include: args.subs,
            burn: args.burn,
            burn_method: args
                .burn_method
                .as_deref()
                .map(str::parse::<BurnMethod>)
                .transpose()?,
            delay_ms: args.sub_delay_ms,
        },
        target_size_mb: args.target_size,
        runtime: RuntimeFlags {
            dry_run: true,
            verbosity: args.verbose,
        },
    };

    options.validate()?;
    Ok(options)
}

/// `--container` wins when it agrees with the output extension
fn resolve_container(flag: Option<&str>, output: Option<&str>) -> ClipPlanResult<Container> {
    let paths = PathUtils::new();
    let extension = output.and_then(|o| paths.get_extension(o));

    match (flag, extension) {
        (Some(flag), None) => Ok(flag.parse()?),
        (Some(flag), Some(extension)) => {
            let container: Container = flag.parse()?;
            if Container::from_extension(&extension) == Some(container) {
                Ok(container)
            } else {
                Err(OptionsError::ContainerMismatch {
                    container,
                    extension,
                }
                .into())
            }
        }
        (None, Some(extension)) => Container::from_extension(&extension).ok_or_else(|| {
            OptionsError::InvalidValue {
                field: "output extension",
                value: extension,
            }
            .into()
        }),
        (None, None) => Ok(Container::default()),
    }
}

/// Shell-ready commands, then notes
pub fn render_text(response: &PlanResponse, verbose: bool) -> String {
    let mut out = String::new();

    for command in &response.commands.commands {
        let _ = writeln!(out, "{}", shell_join(FFMPEG, &command.args));
    }

    if !response.commands.artifacts.is_empty() {
        let _ = writeln!(out, "# temporary files:");
        for artifact in &response.commands.artifacts {
            let _ = writeln!(out, "#   {}", artifact.display());
        }
    }

    for warning in &response.plan.warnings {
        let _ = writeln!(out, "# warning: {}", warning);
    }

    if verbose {
        for line in &response.plan.rationale {
            let _ = writeln!(out, "# {}", line);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Encoder;
    use crate::error::ClipPlanError;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: PlanArgs,
    }

    fn parse(extra: &[&str]) -> PlanArgs {
        let mut argv = vec!["clipplan", "--probe", "p.json", "--input", "movie.mkv"];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).args
    }

    #[test]
    fn test_build_options_defaults() {
        let options = build_options(&parse(&[])).unwrap();
        assert_eq!(options.container, Container::Mp4);
        assert_eq!(options.video.encoder, EncoderPreference::Auto);
        assert!(options.audio.include);
        assert_eq!(options.time, TimeSelection::default());
        assert!(options.runtime.dry_run);
    }

    #[test]
    fn test_build_options_full() {
        let options = build_options(&parse(&[
            "--start", "1:30", "--duration", "1m11s", "--encoder", "hevc_nvenc",
            "--resolution", "720p", "--burn", "1", "--sub-delay-ms", "-250", "--target-size", "8",
            "-o", "out.mkv",
        ]))
        .unwrap();

        assert_eq!(options.time.start, Some(90.0));
        assert_eq!(options.time.duration, Some(71.0));
        assert_eq!(options.container, Container::Mkv);
        assert_eq!(options.video.encoder, EncoderPreference::Explicit(Encoder::HevcNvenc));
        assert_eq!(options.video.resolution, Some(Resolution::P720));
        assert_eq!(options.subtitles.delay_ms, Some(-250));
        assert_eq!(options.target_size_mb, Some(8.0));
    }

    #[test]
    fn test_container_mismatch() {
        let result = build_options(&parse(&["--container", "webm", "-o", "clip.mp4"]));
        assert!(matches!(
            result,
            Err(ClipPlanError::Options(OptionsError::ContainerMismatch { .. }))
        ));
    }

    #[test]
    fn test_unknown_output_extension() {
        let result = build_options(&parse(&["-o", "clip.avi"]));
        assert!(matches!(
            result,
            Err(ClipPlanError::Options(OptionsError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_delay_without_burn_is_rejected() {
        let result = build_options(&parse(&["--sub-delay-ms", "100"]));
        assert!(matches!(
            result,
            Err(ClipPlanError::Options(OptionsError::RequiresBurn { .. }))
        ));
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let result = build_options(&parse(&["--start", "soon"]));
        assert!(matches!(result, Err(ClipPlanError::InvalidTimeFormat { .. })));
    }
}
