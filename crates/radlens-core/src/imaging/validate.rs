//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::AnalysisError;

/// DICOM files carry a 128-byte preamble followed by the `DICM` magic code.
const DICOM_MAGIC_OFFSET: usize = 128;
const HEADER_LEN: usize = DICOM_MAGIC_OFFSET + 4;

/// Image kind recognized from file magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedKind {
    Jpeg,
    Png,
    Dicom,
}

/// Validates files before decoding.
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
    /// Checks:
    /// - File exists and is readable
    /// - File size is within limits
    /// - Magic bytes match a supported medical image format
    pub fn validate(&self, path: &Path) -> Result<(), AnalysisError> {
        if !path.exists() {
            return Err(AnalysisError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| AnalysisError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(AnalysisError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let mut file = std::fs::File::open(path).map_err(|e| AnalysisError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open file: {}", e),
        })?;

        let mut header = [0u8; HEADER_LEN];
        let bytes_read = read_up_to(&mut file, &mut header);

        match sniff_kind(&header[..bytes_read]) {
            Some(_) => Ok(()),
            None => Err(AnalysisError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            }),
        }
    }
}

/// Read as many header bytes as the file offers, up to the buffer size.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> usize {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) | Err(_) => break,
            Ok(n) => filled += n,
        }
    }
    filled
}

/// Recognize a supported image kind from leading file bytes.
///
/// JPEG: `FF D8 FF`. PNG: `89 50 4E 47`. DICOM: `DICM` at offset 128.
pub fn sniff_kind(header: &[u8]) -> Option<SniffedKind> {
    if header.len() >= 3 && header[0] == 0xFF && header[1] == 0xD8 && header[2] == 0xFF {
        return Some(SniffedKind::Jpeg);
    }

    if header.len() >= 4
        && header[0] == 0x89
        && header[1] == b'P'
        && header[2] == b'N'
        && header[3] == b'G'
    {
        return Some(SniffedKind::Png);
    }

    if header.len() >= HEADER_LEN
        && &header[DICOM_MAGIC_OFFSET..DICOM_MAGIC_OFFSET + 4] == b"DICM"
    {
        return Some(SniffedKind::Dicom);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dicom_header() -> Vec<u8> {
        let mut header = vec![0u8; HEADER_LEN];
        header[DICOM_MAGIC_OFFSET..].copy_from_slice(b"DICM");
        header
    }

    #[test]
    fn test_sniff_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(sniff_kind(&header), Some(SniffedKind::Jpeg));
    }

    #[test]
    fn test_sniff_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(sniff_kind(&header), Some(SniffedKind::Png));
    }

    #[test]
    fn test_sniff_dicom() {
        assert_eq!(sniff_kind(&dicom_header()), Some(SniffedKind::Dicom));
    }

    #[test]
    fn test_sniff_rejects_short_dicom() {
        // A file shorter than preamble + magic cannot be DICOM
        let header = b"DICM";
        assert_eq!(sniff_kind(header), None);
    }

    #[test]
    fn test_sniff_rejects_garbage() {
        let header = [0u8; HEADER_LEN];
        assert_eq!(sniff_kind(&header), None);
    }

    #[test]
    fn test_validate_missing_file() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator
            .validate(Path::new("/nonexistent/scan.png"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut file = std::fs::File::create(&path).unwrap();
        // 2MB of zeros against a 1MB limit
        file.write_all(&vec![0u8; 2 * 1024 * 1024]).unwrap();

        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let err = Validator::new(limits).validate(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::FileTooLarge { .. }));
    }

    #[test]
    fn test_validate_rejects_unrecognized_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = Validator::new(LimitsConfig::default())
            .validate(&path)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_validate_accepts_dicom_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.dcm");
        std::fs::write(&path, dicom_header()).unwrap();

        assert!(Validator::new(LimitsConfig::default()).validate(&path).is_ok());
    }
}
