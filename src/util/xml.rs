use serde::Deserialize;

/// S3-style `<Error>` document returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlError {
    #[serde(rename = "Code")]
    pub(crate) code: Option<String>,
    #[serde(rename = "Message")]
    pub(crate) message: Option<String>,
    #[serde(rename = "RequestId")]
    pub(crate) request_id: Option<String>,
    #[serde(rename = "HostId")]
    pub(crate) host_id: Option<String>,
}

pub(crate) fn parse_error_xml(body: &str) -> Option<XmlError> {
    if body.trim().is_empty() {
        return None;
    }

    quick_xml::de::from_str::<XmlError>(body).ok()
}
