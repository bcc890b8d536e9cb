use std::result::Result as StdResult;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{report}: cannot decode `{field}`: {reason}")]
    Decode {
        report: &'static str,
        field: String,
        reason: String,
    },

    #[error("{0}")]
    Msg(String),
}

pub type Result<T> = StdResult<T, Error>;
