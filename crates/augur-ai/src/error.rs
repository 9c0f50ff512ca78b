use thiserror::Error;

#[derive(Error, Debug)]
pub enum RationaleError {
    #[error(
        "missing rationale input(s): {}; ensure both model inference and risk summaries are completed",
        .0.join(", ")
    )]
    MissingInputs(Vec<&'static str>),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("completion contained no rationale text")]
    EmptyCompletion,
}
