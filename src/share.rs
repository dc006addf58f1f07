//! Writing rendered share images to disk.
use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};

use crate::{JournalError, Result, ShareTarget};

/// File name used for direct downloads
pub const DOWNLOAD_FILE_NAME: &str = "soulscribe-verse.png";
/// File name used for attachments handed to a share surface
pub const SHARE_FILE_NAME: &str = "prayer-verse.png";

impl ShareTarget {
    pub fn file_name(&self) -> &'static str {
        match self {
            ShareTarget::Download => DOWNLOAD_FILE_NAME,
            ShareTarget::Share => SHARE_FILE_NAME,
        }
    }
}

/// Decodes a `data:<mime>;base64,<payload>` URI into its bytes
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| JournalError::InvalidDataUri {
            message: "missing data: scheme".to_string(),
        })?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| JournalError::InvalidDataUri {
            message: "missing payload separator".to_string(),
        })?;
    if !header.ends_with(";base64") {
        return Err(JournalError::InvalidDataUri {
            message: format!("unsupported encoding in header {:?}", header),
        });
    }

    STANDARD
        .decode(payload)
        .map_err(|e| JournalError::InvalidDataUri {
            message: e.to_string(),
        })
}

/// Writes the image in `uri` into `dir` under the target's file name
pub fn export_image(uri: &str, dir: &Path, target: ShareTarget) -> Result<PathBuf> {
    let bytes = decode_data_uri(uri)?;

    if !dir.exists() {
        debug!("Creating export directory: {}", dir.display());
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(target.file_name());
    fs::write(&path, &bytes)?;
    info!("Exported share image to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"png!"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"png!");
    }

    #[test]
    fn rejects_non_data_uris() {
        for uri in [
            "https://example.test/a.png",
            "data:image/png;base64",
            "data:text/plain,hello",
            "data:image/png;base64,@@@",
        ] {
            assert!(
                matches!(decode_data_uri(uri), Err(JournalError::InvalidDataUri { .. })),
                "{uri}"
            );
        }
    }

    #[test]
    fn export_uses_target_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("data:image/png;base64,{}", STANDARD.encode([1u8, 2, 3]));

        let download = export_image(&uri, &dir.path().join("out"), ShareTarget::Download).unwrap();
        let share = export_image(&uri, &dir.path().join("out"), ShareTarget::Share).unwrap();

        assert!(download.ends_with(DOWNLOAD_FILE_NAME));
        assert!(share.ends_with(SHARE_FILE_NAME));
        assert_eq!(fs::read(download).unwrap(), vec![1, 2, 3]);
    }
}
