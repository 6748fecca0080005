//! Finding the build of the current commit and waiting for it to finish.
//!
//! - [`resolver`] - maps tag / pull request / commit to a build version
//! - [`jobs`] - lists the jobs of a build version and their statuses
//! - [`poller`] - the polling loop composing both until a terminal state

pub mod jobs;
pub mod poller;
pub mod resolver;

pub use jobs::{resolve_jobs, Job};
pub use poller::wait_for_build;
pub use resolver::resolve_build_version;
