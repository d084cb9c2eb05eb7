use validator::ValidationErrors;

/// Everything that can go wrong while working the roster
///
/// The presentation layer renders each of these differently; in particular a
/// `NotFound` must never be dressed up as a `Fetch`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote collection couldn't be read
    #[error("cannot reach the user service")]
    Fetch(#[source] reqwest::Error),

    /// Neither the working list nor the remote collection knows this id
    #[error("no user with id {id}")]
    NotFound { id: u64 },

    /// The remote collection rejected a create/update/delete
    #[error("the user service rejected the change")]
    Write(#[source] reqwest::Error),

    /// The snapshot slot couldn't be replaced
    #[error("cannot persist the roster snapshot")]
    Store(#[source] anyhow::Error),

    /// The submitted fields failed validation; nothing was sent anywhere
    #[error("some fields are invalid")]
    Invalid(#[source] ValidationErrors),
}

impl Error {
    pub(crate) fn fetch(err: reqwest::Error) -> Self {
        Self::Fetch(err)
    }

    pub(crate) fn write(err: reqwest::Error) -> Self {
        Self::Write(err)
    }
}
