use serde::{Deserialize, Serialize};

/// Metadata returned to the client after a successful upload.
///
/// The server keeps no copy: the client persists this record locally and
/// replaces it wholesale on re-upload (single-resume-per-user policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    /// Upload timestamp in epoch milliseconds; doubles as the record id.
    pub id: String,
    /// Original display name, unsanitized, for presentation only.
    pub file_name: String,
    /// Canonical object-store key; always under `users/<namespace>/`.
    pub s3_key: String,
    /// ISO-8601 timestamp set at upload completion.
    pub uploaded_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let record = ResumeRecord {
            id: "1722470400000".to_string(),
            file_name: "resume.docx".to_string(),
            s3_key: "users/jane.doe_at_x.com/original-resumes/1722470400000_resume.docx"
                .to_string(),
            uploaded_date: "2026-08-07T12:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "1722470400000");
        assert_eq!(value["fileName"], "resume.docx");
        assert_eq!(
            value["s3Key"],
            "users/jane.doe_at_x.com/original-resumes/1722470400000_resume.docx"
        );
        assert_eq!(value["uploadedDate"], "2026-08-07T12:00:00.000Z");
    }
}
