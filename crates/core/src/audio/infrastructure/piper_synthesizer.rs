use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::audio::domain::speech_synthesizer::SpeechSynthesizer;

/// Text-to-speech through the `piper` command-line engine.
///
/// The script goes to piper's stdin; piper writes a WAV file.
#[derive(Debug)]
pub struct PiperSynthesizer {
    program: OsString,
    model_path: PathBuf,
}

impl PiperSynthesizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Piper voice model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            program: OsString::from("piper"),
            model_path: model_path.to_path_buf(),
        })
    }

    /// Use a specific piper executable instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, output_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--model")
            .arg(&self.model_path)
            .arg("--output_file")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SpeechSynthesizer for PiperSynthesizer {
    fn synthesize(&self, text: &str, output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut child = self
            .command(output_path)
            .spawn()
            .map_err(|e| format!("Failed to start {:?}: {e}", self.program))?;

        {
            let stdin = child.stdin.as_mut().ok_or("Failed to open piper stdin")?;
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("piper exited with {}: {}", output.status, stderr.trim()).into());
        }
        if !output_path.exists() {
            return Err(format!("piper produced no file at {}", output_path.display()).into());
        }

        log::info!("Narration written to {}", output_path.display());
        Ok(())
    }
}
