use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::render::domain::renderer::{RenderJob, RenderStyle, Renderer};
use crate::render::domain::subtitles::format_srt;

const SUBTITLE_FILENAME: &str = "captions.srt";

/// Composes the final video with a single `ffmpeg` invocation.
///
/// Each background interval becomes one video segment (a looped clip or a
/// colour source) trimmed to the interval length; segments are concatenated,
/// captions are burnt in from an SRT file and the narration is muxed on top.
/// ffmpeg runs inside the job's work dir so the subtitle filter can name the
/// SRT file without path escaping.
pub struct FfmpegCliRenderer {
    program: OsString,
    style: RenderStyle,
}

impl FfmpegCliRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            program: OsString::from("ffmpeg"),
            style,
        }
    }

    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Video filter graph; the final label is `[out]`.
    pub(crate) fn filter_graph(&self, job: &RenderJob) -> String {
        let (w, h) = self.style.frame_size;
        let fps = self.style.fps;
        let mut graph = String::new();
        let mut input = 0usize;

        for (i, background) in job.backgrounds.iter().enumerate() {
            let d = background.duration();
            match background.payload() {
                Some(_) => {
                    let _ = write!(
                        graph,
                        "[{input}:v]trim=duration={d:.3},setpts=PTS-STARTPTS,\
                         scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},\
                         fps={fps},setsar=1[v{i}];"
                    );
                    input += 1;
                }
                None => {
                    let _ = write!(
                        graph,
                        "color=c={}:s={w}x{h}:r={fps}:d={d:.3},setsar=1[v{i}];",
                        self.style.fallback_color
                    );
                }
            }
        }

        for i in 0..job.backgrounds.len() {
            let _ = write!(graph, "[v{i}]");
        }
        let _ = write!(
            graph,
            "concat=n={}:v=1:a=0[bg];[bg]subtitles={SUBTITLE_FILENAME}:force_style='Fontsize={},Alignment=2,Outline=2,Shadow=0'[out]",
            job.backgrounds.len(),
            self.style.font_size
        );
        graph
    }

    /// Full ffmpeg argument list for `job`. Paths must already be absolute.
    pub(crate) fn build_args(&self, job: &RenderJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-hide_banner".into()];

        let mut clip_inputs = 0usize;
        for background in job.backgrounds {
            if let Some(path) = background.payload() {
                // Short clips loop until trimmed.
                args.extend(["-stream_loop".into(), "-1".into(), "-i".into()]);
                args.push(path.as_os_str().to_owned());
                clip_inputs += 1;
            }
        }
        args.push("-i".into());
        args.push(job.audio_path.as_os_str().to_owned());

        args.push("-filter_complex".into());
        args.push(self.filter_graph(job).into());
        args.extend([
            "-map".into(),
            "[out]".into(),
            "-map".into(),
            format!("{clip_inputs}:a:0").into(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            "aac".into(),
            "-r".into(),
            self.style.fps.to_string().into(),
            "-t".into(),
            format!("{:.3}", job.duration).into(),
        ]);
        args.push(job.output_path.as_os_str().to_owned());
        args
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

impl Renderer for FfmpegCliRenderer {
    fn render(&self, job: &RenderJob) -> Result<(), Box<dyn std::error::Error>> {
        if job.backgrounds.is_empty() {
            return Err("Nothing to render: background timeline is empty".into());
        }

        fs::write(job.work_dir.join(SUBTITLE_FILENAME), format_srt(job.captions))?;

        let backgrounds = job
            .backgrounds
            .iter()
            .map(|b| match b.payload() {
                Some(p) => absolute(p).map(|p| b.with_payload(Some(p))),
                None => Ok(b.with_payload(None)),
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        let audio_path = absolute(job.audio_path)?;
        let output_path = absolute(job.output_path)?;
        let resolved = RenderJob {
            audio_path: &audio_path,
            backgrounds: &backgrounds,
            output_path: &output_path,
            ..*job
        };

        log::info!(
            "Composing {} segments ({:.2}s) into {}",
            backgrounds.len(),
            job.duration,
            output_path.display()
        );
        let output = Command::new(&self.program)
            .args(self.build_args(&resolved))
            .current_dir(job.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("Failed to start {:?}: {e}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(format!("ffmpeg exited with {}: {}", output.status, tail.join("\n")).into());
        }

        log::info!("Video written to {}", output_path.display());
        Ok(())
    }
}
