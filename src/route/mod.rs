//! Asset request router.
//!
//! Matches a request path against the two asset patterns and produces the
//! complete response: a 404, the stored file verbatim, or the image
//! transcoded to the configured target format.
//!
//! ```text
//! handle(path)
//!   ├─ no match            → None (host handles the request)
//!   ├─ asset/<id>          → non-image: serve_file
//!   │                        image:     serve_image(full)
//!   └─ asset/<size>/<id>   → serve_image(size)
//!
//! serve_image
//!   gif?                   → serve_file
//!   decode failed?         → serve_file
//!   resize (if size known) → encode target → encode native → serve_file
//! ```

mod pattern;
mod response;

use std::sync::Arc;

pub use pattern::{PREFIX, RouteMatch, asset_path, normalize};
pub use response::{AssetResponse, Body, CACHE_CONTROL, CONTENT_TYPE};

use crate::debug;
use crate::hooks::Hooks;
use crate::media::{AssetId, AssetResolver, ResolvedAsset};
use crate::rewrite::RequestContext;
use crate::settings::{SettingsStore, TranscodeSettings, keys};
use crate::sizes::{FULL, POST_THUMBNAIL, SizeRegistry};
use crate::transcode::SourceImage;
use crate::utils::mime::types;

/// Default `Cache-Control` max-age: one year.
pub const DEFAULT_MAX_AGE: u64 = 31_536_000;

/// Dispatches matched asset routes.
#[derive(Clone)]
pub struct AssetRouter {
    resolver: Arc<dyn AssetResolver>,
    sizes: Arc<SizeRegistry>,
    settings: Arc<dyn SettingsStore>,
    hooks: Arc<Hooks>,
}

impl AssetRouter {
    pub fn new(
        resolver: Arc<dyn AssetResolver>,
        sizes: Arc<SizeRegistry>,
        settings: Arc<dyn SettingsStore>,
        hooks: Arc<Hooks>,
    ) -> Self {
        Self {
            resolver,
            sizes,
            settings,
            hooks,
        }
    }

    /// Handle `request_path`, or return `None` if it is not an asset route.
    ///
    /// On a match, URL rewriting is disabled for the rest of the request
    /// before anything is resolved, so lookups see native locations.
    pub fn handle(&self, ctx: &RequestContext, request_path: &str) -> Option<AssetResponse> {
        let route = RouteMatch::parse(request_path)?;
        ctx.guard().disable();

        let Some(id) = route.asset_id() else {
            debug!("route"; "asset id out of range in `{}`", request_path);
            return Some(AssetResponse::not_found());
        };

        let response = match route {
            RouteMatch::Attachment { .. } => {
                let asset = self.resolver.resolve(id);
                if asset.is_image() {
                    self.serve_image(ctx, id, FULL)
                } else {
                    self.serve_file(ctx, &asset)
                }
            }
            RouteMatch::Image { size, .. } => self.serve_image(ctx, id, &size),
        };
        Some(response)
    }

    /// Size name actually served for `requested`, after limit overrides.
    ///
    /// The override is not checked against the registry: an unknown name
    /// simply means no resize.
    pub fn effective_size(&self, requested: &str) -> String {
        let limit = match requested {
            FULL => self.settings.get_non_empty(keys::FULL_IMAGE_LIMIT),
            POST_THUMBNAIL => self.settings.get_non_empty(keys::FEATURED_IMAGE_LIMIT),
            _ => None,
        };
        limit.unwrap_or_else(|| requested.to_string())
    }

    fn serve_image(&self, ctx: &RequestContext, id: AssetId, requested: &str) -> AssetResponse {
        let size = self.effective_size(requested);
        let asset = self.resolver.resolve(id);

        // Re-encoding would drop animation frames
        if asset.mime_type == types::GIF {
            return self.serve_file(ctx, &asset);
        }

        let Some(path) = asset.file_path.as_deref() else {
            return self.serve_file(ctx, &asset);
        };

        let mut source = match SourceImage::open(path) {
            Ok(source) => source,
            Err(err) => {
                debug!("route"; "asset {}: {}, serving original", id, err);
                return self.serve_file(ctx, &asset);
            }
        };

        match self.sizes.get(&size) {
            Some(definition) => {
                if source.resize(definition) {
                    let (width, height) = source.dimensions();
                    debug!("route"; "asset {}: resized to {}x{} ({})", id, width, height, size);
                }
            }
            None => debug!("route"; "asset {}: unknown size `{}`, not resizing", id, size),
        }

        let cache_control = self.cache_control(ctx);
        let settings = TranscodeSettings::from_store(self.settings.as_ref());

        let encoded = source
            .encode(settings.target_format, settings.quality)
            .or_else(|err| {
                debug!("route"; "asset {}: {}, using native format", id, err);
                source.encode_native(settings.quality)
            });

        match encoded {
            Ok(encoded) => {
                AssetResponse::ok(encoded.mime_type, cache_control, Body::Bytes(encoded.bytes))
            }
            Err(err) => {
                debug!("route"; "asset {}: {}, serving original", id, err);
                self.serve_file(ctx, &asset)
            }
        }
    }

    fn serve_file(&self, ctx: &RequestContext, asset: &ResolvedAsset) -> AssetResponse {
        match &asset.file_path {
            Some(path) => AssetResponse::ok(
                &asset.mime_type,
                self.cache_control(ctx),
                Body::File(path.clone()),
            ),
            None => AssetResponse::not_found(),
        }
    }

    fn cache_control(&self, ctx: &RequestContext) -> String {
        let max_age = self.hooks.cache_expires.apply(ctx, DEFAULT_MAX_AGE, &());
        format!("public, max-age={max_age}")
    }
}
