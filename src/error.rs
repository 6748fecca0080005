//! Error handling for appveyor-artifacts.
//!
//! Every user-facing failure of a run is one variant of [`Error`]. The site
//! that detects a failure logs a human-readable diagnostic first and then
//! returns the error, so the top level only has to decide on the exit status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while resolving, polling or downloading a build.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The server did not answer within the timeout, on every attempt.
    #[error("Timed out waiting for reply from server: {url}")]
    Unresponsive { url: String },

    /// The server could not be reached, on every attempt.
    #[error("Unable to connect to server: {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The server answered with a status outside of 200-299.
    ///
    /// `message` is the `message` field of a JSON error body when there is
    /// one, the raw body otherwise.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 2xx reply that is not JSON.
    #[error("Failed to parse JSON reply: {body}")]
    InvalidJson { body: String },

    /// A JSON reply missing a key the protocol requires.
    #[error("Bad JSON reply: {0}")]
    MalformedResponse(String),

    /// No job carries the configured job name.
    #[error("Job name \"{0}\" not found")]
    JobNameNotFound(String),

    /// One of the build's jobs failed. Holds the job's web URL.
    #[error("AppVeyor job failed: {url}")]
    JobFailed { url: String },

    /// Jobs reported statuses this tool does not know how to wait on.
    #[error("Got unknown status from AppVeyor API: {}", .0.join(" "))]
    UnknownStatus(Vec<String>),

    /// No build matched the configured identity in the allotted attempts.
    #[error("Timed out waiting for job to be queued or build not found")]
    BuildNotFound,

    /// Two artifacts resolved to the same local path and no policy applies.
    #[error("Collision: {} from {first} and {second}", .path.display())]
    Collision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// A remote file name that would place the download outside of the
    /// download directory.
    #[error("Refusing {file_name} from job {job_id}: path leaves the download directory")]
    UnsafePath { job_id: String, file_name: String },

    /// The download destination is already on disk.
    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    /// The downloaded file is not the size the API announced.
    #[error("Expected {expected} bytes but got {actual} bytes instead")]
    SizeMismatch { expected: u64, actual: u64 },

    /// A coverage file references a source file missing on this machine.
    #[error("No such file: {}", .0.display())]
    MissingLocalFile(PathBuf),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

/// Result type alias for operations that can fail with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
