use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Audio extensions the pipeline accepts, matched case-insensitively.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] =
    &[".mp3", ".wav", ".m4a", ".flac", ".ogg", ".aac"];

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported audio format: {extension}. Supported formats: {}", SUPPORTED_AUDIO_EXTENSIONS.join(", "))]
    UnsupportedFormat { extension: String },

    #[error("no supported audio files found. Supported formats: {}", SUPPORTED_AUDIO_EXTENSIONS.join(", "))]
    NoAudioFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Resolves user input into concrete audio file paths inside the working
/// audio directory. Originals are never modified or deleted.
pub struct AudioResolver {
    upload_dir: PathBuf,
    audio_dir: PathBuf,
}

/// True when the path carries a `.zip` extension.
pub fn is_zip_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

impl AudioResolver {
    pub fn new(upload_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Result<Self, ResolveError> {
        let upload_dir = upload_dir.into();
        let audio_dir = audio_dir.into();
        fs::create_dir_all(&audio_dir)?;

        Ok(Self { upload_dir, audio_dir })
    }

    /// Resolve an input path to the audio files it contains, in input order.
    ///
    /// A ZIP yields its supported members in archive listing order (possibly
    /// none); a single supported file yields a one-element list. Anything
    /// else is an `UnsupportedFormat` error.
    pub fn resolve(&self, input: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        if is_zip_file(input) {
            info!("Extracting audio files from: {}", input.display());
            self.extract_audio_files(input)
        } else if Self::is_supported_audio_file(input) {
            info!("Processing single audio file: {}", input.display());
            Ok(vec![self.copy_single_audio_file(input)?])
        } else {
            let extension = input
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{ext}"))
                .unwrap_or_else(|| "(none)".to_string());
            Err(ResolveError::UnsupportedFormat { extension })
        }
    }

    /// Check a file name against the supported extension list.
    pub fn is_supported_audio_file(path: &Path) -> bool {
        Self::has_supported_extension(&path.to_string_lossy())
    }

    fn has_supported_extension(name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        SUPPORTED_AUDIO_EXTENSIONS
            .iter()
            .any(|ext| lowered.ends_with(ext))
    }

    /// Copy a single audio file into the audio directory. A same-named file
    /// already present gets a numeric suffix before the extension.
    fn copy_single_audio_file(&self, audio_path: &Path) -> Result<PathBuf, ResolveError> {
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let dest = self.unique_destination(&file_name);
        fs::copy(audio_path, &dest)?;
        info!("Copied audio file: {}", file_name);

        Ok(dest)
    }

    fn unique_destination(&self, file_name: &str) -> PathBuf {
        let mut dest = self.audio_dir.join(file_name);
        if !dest.exists() {
            return dest;
        }

        let (stem, extension) = match file_name.rfind('.') {
            Some(idx) => (&file_name[..idx], &file_name[idx..]),
            None => (file_name, ""),
        };

        let mut counter = 1;
        while dest.exists() {
            dest = self.audio_dir.join(format!("{stem}_{counter}{extension}"));
            counter += 1;
        }
        dest
    }

    /// Extract supported audio members from a ZIP archive into the audio
    /// directory, preserving member-relative paths and listing order.
    pub fn extract_audio_files(&self, zip_path: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let file = File::open(zip_path)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        let mut extracted = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() || !Self::has_supported_extension(entry.name()) {
                continue;
            }

            // enclosed_name rejects entries that would escape the audio dir
            let relative = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    warn!("Skipping archive member with unsafe path: {}", entry.name());
                    continue;
                }
            };

            let dest = self.audio_dir.join(&relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut out = File::create(&dest)?;
            std::io::copy(&mut entry, &mut out)?;
            info!("Extracted: {}", relative.display());

            extracted.push(dest);
        }

        Ok(extracted)
    }

    /// Persist raw uploaded bytes into the upload directory.
    pub fn save_upload(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, ResolveError> {
        fs::create_dir_all(&self.upload_dir)?;
        let path = self.upload_dir.join(filename);

        let mut file = File::create(&path)?;
        file.write_all(bytes)?;

        Ok(path)
    }

    /// Remove extracted working files and recreate the audio directory.
    pub fn cleanup(&self) -> Result<(), ResolveError> {
        if self.audio_dir.exists() {
            fs::remove_dir_all(&self.audio_dir)?;
        }
        fs::create_dir_all(&self.audio_dir)?;
        Ok(())
    }
}
