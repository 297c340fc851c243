//! URL rewrite guard.
//!
//! - [`guard`]: request-scoped enable latch and re-entrancy lock
//! - [`attachments`]: the filter callbacks that substitute router URLs

mod attachments;
mod guard;

pub use attachments::RewriteAttachments;
pub use guard::{RequestContext, RewriteGuard, RewriteLock};
