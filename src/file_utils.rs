use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @const: Suffix appended to the input stem for the default output file
pub const OUTPUT_SUFFIX: &str = "_translated";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: `<dir>/<stem>_translated.srt` next to the input
    pub fn default_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "subtitles".to_string());

        input_file.with_file_name(format!("{}{}.srt", stem, OUTPUT_SUFFIX))
    }

    /// Read a subtitle file as text
    ///
    /// Bytes that are not valid UTF-8 are decoded as Latin-1, which maps every byte to
    /// the code point of the same value.
    pub fn read_subtitle_file<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(anyhow!("Input file does not exist: {}", path.display()));
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("{} is not valid UTF-8, decoding as Latin-1", path.display());
                Ok(decode_latin1(e.as_bytes()))
            }
        }
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write to file: {}", path.display()))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());

        Ok(())
    }
}

// @decodes: ISO-8859-1 bytes
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
