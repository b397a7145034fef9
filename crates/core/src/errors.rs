use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown business type tag: {0}")]
    UnknownBizType(i32),

    #[error("Unknown permission level tag: {0}")]
    UnknownPermissionLevel(i32),

    #[error("State backend error: {0}")]
    StateError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
