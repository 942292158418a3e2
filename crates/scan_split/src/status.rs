use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, FileSplit, Result};

/// File metadata as observed by a reader just before scanning. Gathering it
/// is the caller's job; this type only carries the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub size: i64,
    pub modified_time: i64,
}

impl FileStatus {
    pub fn new(size: i64, modified_time: i64) -> Self {
        Self { size, modified_time }
    }
}

impl FileSplit {
    /// Checks the descriptor's recorded file metadata against an observed
    /// status.
    ///
    /// # Errors
    /// - `StaleSplit` if the size or modification time changed, or the range
    ///   extends past the observed end of file
    pub fn reconcile(&self, status: &FileStatus) -> Result<()> {
        let reason = if status.size != self.file_size() {
            Some(format!(
                "file size changed from {} to {}",
                self.file_size(),
                status.size
            ))
        } else if status.modified_time != self.file_modified_time() {
            Some(format!(
                "modification time changed from {} to {}",
                self.file_modified_time(),
                status.modified_time
            ))
        } else if self.end() > status.size {
            Some(format!(
                "range ends at {} past end of file {}",
                self.end(),
                status.size
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!(split = %self, reason = %reason, "Stale file split");
                Err(Error::StaleSplit { path: self.path().to_string(), reason })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture() -> FileSplit {
        FileSplit::builder()
            .path("/data/t.orc")
            .start(1024)
            .length(1024)
            .file_size(2048)
            .file_modified_time(1_700_000_000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_matching_status_reconciles() {
        let actual = fixture().reconcile(&FileStatus::new(2048, 1_700_000_000));
        assert!(actual.is_ok());
    }

    #[test]
    fn test_grown_file_is_stale() {
        let actual = fixture()
            .reconcile(&FileStatus::new(4096, 1_700_000_000))
            .unwrap_err();
        assert_eq!(
            actual.to_string(),
            "Split of '/data/t.orc' is stale: file size changed from 2048 to 4096"
        );
    }

    #[test]
    fn test_touched_file_is_stale() {
        let actual = fixture()
            .reconcile(&FileStatus::new(2048, 1_700_000_500))
            .unwrap_err();
        assert!(matches!(actual, Error::StaleSplit { ref reason, .. } if reason.contains("modification time")));
    }

    #[test]
    fn test_range_past_end_is_stale() {
        let fixture = fixture().to_builder().length(4096).build().unwrap();
        let actual = fixture
            .reconcile(&FileStatus::new(2048, 1_700_000_000))
            .unwrap_err();
        assert!(matches!(actual, Error::StaleSplit { ref reason, .. } if reason.contains("past end of file")));
    }

    #[test]
    fn test_status_wire_shape() {
        let actual = serde_json::to_value(FileStatus::new(10, 20)).unwrap();
        let expected = serde_json::json!({"size": 10, "modifiedTime": 20});
        assert_eq!(actual, expected);
    }
}
