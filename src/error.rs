use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;

/// Reasons a playlist build stops before producing a result
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("catalog profile did not include a user identifier")]
    MissingUserIdentity,
    #[error("no artists were resolved from the configured sources")]
    NoArtistsResolved,
    #[error("no tracks could be generated for the playlist")]
    NoTracksGenerated,
    #[error("failed to read artists file '{}': {source}", path.display())]
    ArtistFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    CatalogRequestFailed(#[from] CatalogError),
}
