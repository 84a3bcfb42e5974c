/// Transient outcome banner for the most recent document upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadStatus {
    pub success: bool,
    pub message: String,
}
