//! Typed interception points.
//!
//! Each [`Filter`] is a named chain of callbacks. A callback receives the
//! value produced so far plus read-only arguments, and returns the (possibly
//! modified) value. Callbacks run in ascending priority; equal priorities run
//! in registration order.
//!
//! | Filter                | Value                | Arguments      |
//! |-----------------------|----------------------|----------------|
//! | `cache_expires`       | max-age seconds      | -              |
//! | `attachment_url`      | attachment URL       | `AssetId`      |
//! | `image_src`           | [`ImageSrc`]         | [`ImageSrcArgs`] |
//! | `attachment_metadata` | `AttachmentMetadata` | `AssetId`      |
//!
//! The registry is built once at startup and shared read-only.

mod events;

use std::fmt;

pub use events::{ImageSrc, ImageSrcArgs, SizeArg};

use crate::media::{AssetId, AttachmentMetadata};
use crate::rewrite::RequestContext;

/// Priority for ordinary callbacks.
pub const PRIORITY_DEFAULT: i32 = 10;

/// Priority that runs after every other callback.
pub const PRIORITY_LAST: i32 = i32::MAX;

type Callback<T, A> = Box<dyn Fn(&RequestContext, T, &A) -> T + Send + Sync>;

/// A named, priority-ordered chain of callbacks.
pub struct Filter<T, A = ()> {
    name: &'static str,
    callbacks: Vec<(i32, Callback<T, A>)>,
}

impl<T, A> Filter<T, A> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback at `priority`.
    pub fn add<F>(&mut self, priority: i32, callback: F)
    where
        F: Fn(&RequestContext, T, &A) -> T + Send + Sync + 'static,
    {
        let index = self.callbacks.partition_point(|(p, _)| *p <= priority);
        self.callbacks.insert(index, (priority, Box::new(callback)));
    }

    /// Run `value` through every callback.
    pub fn apply(&self, ctx: &RequestContext, value: T, args: &A) -> T {
        self.callbacks
            .iter()
            .fold(value, |value, (_, callback)| callback(ctx, value, args))
    }

    #[cfg(test)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T, A> fmt::Debug for Filter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Every interception point known to the server.
#[derive(Debug)]
pub struct Hooks {
    /// Cache max-age in seconds for core-served responses.
    pub cache_expires: Filter<u64>,
    pub attachment_url: Filter<String, AssetId>,
    pub image_src: Filter<ImageSrc, ImageSrcArgs>,
    pub attachment_metadata: Filter<AttachmentMetadata, AssetId>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            cache_expires: Filter::new("cache_expires"),
            attachment_url: Filter::new("attachment_url"),
            image_src: Filter::new("image_src"),
            attachment_metadata: Filter::new("attachment_metadata"),
        }
    }
}
