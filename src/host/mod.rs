//! In-process media host.
//!
//! Produces the host-side view of an asset: its native URL, the URL and
//! dimensions for a requested size, and its metadata record. Every value is
//! passed through the matching filter before it is returned, which is where
//! URL rewriting takes over.

mod api;
mod uploads;

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub use api::MediaInfo;
pub use uploads::resolve_upload;

use crate::hooks::{Hooks, ImageSrc, ImageSrcArgs, SizeArg};
use crate::media::{AssetId, AssetResolver, AttachmentMetadata};
use crate::rewrite::RequestContext;
use crate::sizes::SizeRegistry;

/// Characters kept verbatim in a URL path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Join a site-relative path onto the base URL.
///
/// ```ignore
/// home_url("https://example.com/", "/asset/42") // "https://example.com/asset/42"
/// home_url("", "asset/42")                      // "/asset/42"
/// ```
pub fn home_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Host-side URL and metadata generation for library assets.
#[derive(Clone)]
pub struct MediaHost {
    resolver: Arc<dyn AssetResolver>,
    sizes: Arc<SizeRegistry>,
    hooks: Arc<Hooks>,
    base_url: String,
    uploads: String,
}

impl MediaHost {
    pub fn new(
        resolver: Arc<dyn AssetResolver>,
        sizes: Arc<SizeRegistry>,
        hooks: Arc<Hooks>,
        base_url: impl Into<String>,
        uploads: &str,
    ) -> Self {
        Self {
            resolver,
            sizes,
            hooks,
            base_url: base_url.into(),
            uploads: uploads.trim_matches('/').to_string(),
        }
    }

    pub fn sizes(&self) -> &SizeRegistry {
        &self.sizes
    }

    /// URL prefix native files are served under.
    pub fn uploads(&self) -> &str {
        &self.uploads
    }

    /// `<base>/<uploads>/<file>`, never filtered.
    pub fn native_url(&self, file: &str) -> String {
        let encoded = file
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        home_url(&self.base_url, &format!("{}/{encoded}", self.uploads))
    }

    /// The asset's URL, after the `attachment_url` filter.
    pub fn attachment_url(&self, ctx: &RequestContext, id: AssetId) -> Option<String> {
        let file = self.resolver.stored_file(id)?;
        let url = self.native_url(&file);
        Some(self.hooks.attachment_url.apply(ctx, url, &id))
    }

    /// URL and dimensions of an image at `size`, after the `image_src`
    /// filter. `None` for unknown assets and non-images.
    pub fn image_src(&self, ctx: &RequestContext, id: AssetId, size: SizeArg) -> Option<ImageSrc> {
        let meta = self.stored_metadata(id)?;
        if meta.width == 0 || meta.height == 0 {
            return None;
        }

        let intermediate = match &size {
            SizeArg::Named(name) => meta.sizes.get(name),
            SizeArg::Dimensions(dims) => {
                let width = dims.first().copied().unwrap_or(0);
                let height = dims.get(1).copied().unwrap_or(0);
                meta.sizes
                    .values()
                    .filter(|entry| entry.width >= width && entry.height >= height)
                    .min_by_key(|entry| u64::from(entry.width) * u64::from(entry.height))
            }
        };

        let src = match intermediate {
            Some(entry) => ImageSrc {
                url: self.native_url(&sibling(&meta.file, &entry.file)),
                width: entry.width,
                height: entry.height,
                intermediate: true,
            },
            None => ImageSrc {
                url: self.native_url(&meta.file),
                width: meta.width,
                height: meta.height,
                intermediate: false,
            },
        };

        let args = ImageSrcArgs { id, size };
        Some(self.hooks.image_src.apply(ctx, src, &args))
    }

    /// The asset's metadata record, after the `attachment_metadata` filter.
    pub fn attachment_metadata(
        &self,
        ctx: &RequestContext,
        id: AssetId,
    ) -> Option<AttachmentMetadata> {
        let meta = self.stored_metadata(id)?;
        Some(self.hooks.attachment_metadata.apply(ctx, meta, &id))
    }

    /// Metadata as stored, before any filter.
    fn stored_metadata(&self, id: AssetId) -> Option<AttachmentMetadata> {
        let file = self.resolver.stored_file(id)?;
        let asset = self.resolver.resolve(id);
        let path = asset.file_path?;
        Some(AttachmentMetadata::generate(&file, &path, &asset.mime_type, &self.sizes))
    }
}

/// `2024/05/photo.jpg` + `photo-150x150.jpg` → `2024/05/photo-150x150.jpg`
fn sibling(file: &str, name: &str) -> String {
    match file.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{name}"),
        None => name.to_string(),
    }
}
