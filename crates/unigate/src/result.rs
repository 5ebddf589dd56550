#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(tag = "type")]
pub enum Error {
    IncorrectData {
        with: &'static str,
    },
    DatabaseError {
        operation: &'static str,
        with: &'static str,
    },
    InternalError,
    OperationFailed,

    RenderFail,
    MissingHeaders,

    InvalidSession,
    UnverifiedAccount,
    UnknownUser,

    EmailFailed,
    InvalidToken,
    InvalidCredentials,

    ShortPassword,
    CompromisedPassword,

    RateLimited {
        retry_after: u64,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type Success = Result<()>;
