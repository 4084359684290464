//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Validates source files before they are decoded.
#[derive(Debug, Clone)]
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks that the file exists, is within the size limit and starts with
    /// a known image signature. Returns the sniffed container name.
    pub fn validate(&self, path: &Path) -> Result<&'static str, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::io(path, e))?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    fn check_magic_bytes(&self, path: &Path) -> Result<&'static str, PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;

        let mut header = [0u8; 12];
        let bytes_read = file
            .read(&mut header)
            .map_err(|e| PipelineError::io(path, e))?;

        if bytes_read < 4 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        Self::sniff_container(&header, bytes_read).ok_or_else(|| PipelineError::Decode {
            path: path.to_path_buf(),
            message: "Unrecognized image format (invalid magic bytes)".to_string(),
        })
    }

    /// Identify the container from its leading bytes.
    pub fn sniff_container(header: &[u8; 12], bytes_read: usize) -> Option<&'static str> {
        if bytes_read < 4 {
            return None;
        }

        if header[..3] == [0xFF, 0xD8, 0xFF] {
            return Some("jpeg");
        }
        if header[..4] == [0x89, b'P', b'N', b'G'] {
            return Some("png");
        }
        if &header[..4] == b"GIF8" {
            return Some("gif");
        }
        if &header[..4] == b"RIFF" {
            // A short read could still be WebP; let the decoder decide.
            if bytes_read < 12 || &header[8..12] == b"WEBP" {
                return Some("webp");
            }
            return None;
        }
        if &header[..2] == b"BM" {
            return Some("bmp");
        }
        if header[..4] == [b'I', b'I', 0x2A, 0x00] || header[..4] == [b'M', b'M', 0x00, 0x2A] {
            return Some("tiff");
        }
        // ISO base media: ftyp box at offset 4, major brand after it
        if bytes_read >= 12 && &header[4..8] == b"ftyp" {
            return match &header[8..12] {
                b"avif" | b"avis" => Some("avif"),
                b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"mif1" | b"msf1" => {
                    Some("heif")
                }
                _ => None,
            };
        }

        None
    }
}
