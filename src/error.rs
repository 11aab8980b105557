#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to decode map document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("map document must be a two-element array [header, map]")]
    NotATwoElementArray,
    #[error("map document is missing the `{0}` collection")]
    MissingCollection(&'static str),
    #[error("`{0}` must be an object keyed by id")]
    NotAnObject(&'static str),
    #[error("invalid {collection} record {id}: {reason}")]
    InvalidRecord {
        collection: &'static str,
        id: String,
        reason: String,
    },
    #[error("reaction {reaction_id} segment {segment_id} references unknown node {node_id}")]
    DanglingEndpoint {
        reaction_id: String,
        segment_id: String,
        node_id: String,
    },
    #[error("arrow head offset fraction {fraction} is outside [0, 1]")]
    ArcLengthOutOfRange { fraction: f64 },
    #[error("unrecognized color `{0}`")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
