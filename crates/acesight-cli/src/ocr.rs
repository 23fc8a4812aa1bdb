//! Text recognition through the `tesseract` executable.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use acesight_core::vision::{Frame, OcrProfile};
use acesight_core::{Error, TextRecognizer};
use tracing::info;

/// Environment variable overriding the tesseract executable path
pub const TESSERACT_ENV: &str = "ACESIGHT_TESSERACT";

/// Recognizer piping PNG-encoded frames into `tesseract stdin stdout`
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
}

impl TesseractRecognizer {
    /// Locate tesseract and check that it runs
    pub fn detect() -> acesight_core::Result<Self> {
        let program = PathBuf::from(
            std::env::var_os(TESSERACT_ENV).unwrap_or_else(|| OsString::from("tesseract")),
        );
        let output = Command::new(&program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                Error::PrerequisiteMissing(format!(
                    "Tesseract OCR not found ({}): install it and make sure `{}` is on PATH or set {}",
                    e,
                    program.display(),
                    TESSERACT_ENV
                ))
            })?;
        if !output.status.success() {
            return Err(Error::PrerequisiteMissing(format!(
                "`{} --version` exited with {}",
                program.display(),
                output.status
            )));
        }

        // Older releases print the version on stderr
        let banner = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        let version = String::from_utf8_lossy(banner);
        info!(
            tag = "OCR",
            "using {}",
            version.lines().next().unwrap_or("tesseract").trim()
        );
        Ok(Self { program })
    }

    fn command(&self, profile: OcrProfile) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["stdin", "stdout", "--psm"])
            .arg(profile.page_segmentation().to_string());
        if let Some(whitelist) = profile.char_whitelist() {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={}", whitelist));
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        command
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize_text(&self, frame: &Frame, profile: OcrProfile) -> acesight_core::Result<String> {
        let image = frame.to_png()?;

        let mut child = self
            .command(profile)
            .spawn()
            .map_err(|e| Error::RecognitionFailed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&image)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::RecognitionFailed(format!(
                "tesseract exited with {}",
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
