//! Request handling assembled from the config.
//!
//! Every request gets a fresh [`RequestContext`]. The asset router sees it
//! first; anything it does not match falls through to the media host.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AppConfig, cfg};
use crate::hooks::{Hooks, PRIORITY_DEFAULT};
use crate::host::MediaHost;
use crate::media::AssetResolver;
use crate::rewrite::{RequestContext, RewriteAttachments};
use crate::route::{AssetResponse, AssetRouter};
use crate::settings::SettingsStore;

/// Router and host sharing one resolver, size registry and hook set.
#[derive(Clone)]
pub struct App {
    router: AssetRouter,
    host: MediaHost,
    media_root: PathBuf,
}

impl App {
    /// Wire up the services. `base_url` is the public origin for every
    /// generated URL.
    pub fn new(
        config: &AppConfig,
        resolver: Arc<dyn AssetResolver>,
        settings: Arc<dyn SettingsStore>,
        base_url: &str,
    ) -> Self {
        let sizes = Arc::new(config.size_registry());
        let hooks = Arc::new(build_hooks(base_url));

        let router = AssetRouter::new(
            Arc::clone(&resolver),
            Arc::clone(&sizes),
            settings,
            Arc::clone(&hooks),
        );
        let host = MediaHost::new(resolver, sizes, hooks, base_url, &config.media.uploads);

        Self {
            router,
            host,
            media_root: config.media.root.clone(),
        }
    }

    pub fn host(&self) -> &MediaHost {
        &self.host
    }

    /// Produce the response for one request path.
    pub fn handle(&self, request_path: &str) -> AssetResponse {
        let ctx = RequestContext::new();
        match self.router.handle(&ctx, request_path) {
            Some(response) => response,
            None => self.host.handle(&ctx, request_path, &self.media_root),
        }
    }
}

/// Hooks registered at startup.
///
/// `[cache] max_age` is read per call, so a config reload applies to the
/// next response.
fn build_hooks(base_url: &str) -> Hooks {
    let mut hooks = Hooks::new();

    hooks
        .cache_expires
        .add(PRIORITY_DEFAULT, |_, max_age, _| cfg().cache.max_age.unwrap_or(max_age));
    RewriteAttachments::new(base_url).register(&mut hooks);

    hooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ManifestEntry, MediaLibrary};
    use crate::route::{Body, CACHE_CONTROL, CONTENT_TYPE, DEFAULT_MAX_AGE};
    use crate::settings::MemorySettings;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "http://media.test";

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        RgbImage::new(640, 480).save(dir.path().join("photo.png")).unwrap();
        fs::write(dir.path().join("report.pdf"), b"%PDF-1.4").unwrap();

        let mut config = AppConfig::default();
        config.media.root = dir.path().to_path_buf();

        let library = MediaLibrary::from_entries(
            dir.path(),
            vec![
                ManifestEntry {
                    id: 1,
                    file: "photo.png".into(),
                    mime_type: None,
                },
                ManifestEntry {
                    id: 2,
                    file: "report.pdf".into(),
                    mime_type: None,
                },
            ],
        );
        let app = App::new(
            &config,
            Arc::new(library),
            Arc::new(MemorySettings::new()),
            BASE,
        );
        (dir, app)
    }

    #[test]
    fn test_asset_route_transcodes() {
        let (_dir, app) = app();

        let response = app.handle("/asset/thumbnail/1/photo.png");
        assert_eq!(response.status, 200);
        assert_eq!(response.header(CONTENT_TYPE), Some("image/webp"));
        assert_eq!(
            response.header(CACHE_CONTROL),
            Some(format!("public, max-age={DEFAULT_MAX_AGE}").as_str())
        );
        let Body::Bytes(bytes) = &response.body else {
            panic!("expected transcoded bytes");
        };
        let decoded = image::load_from_memory(bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (150, 150));
    }

    #[test]
    fn test_non_image_served_raw() {
        let (dir, app) = app();

        let response = app.handle("/asset/2");
        assert_eq!(response.status, 200);
        assert_eq!(response.header(CONTENT_TYPE), Some("application/pdf"));
        let Body::File(path) = &response.body else {
            panic!("expected stored file");
        };
        assert_eq!(path, &dir.path().join("report.pdf"));
    }

    #[test]
    fn test_host_routes_fall_through() {
        let (_dir, app) = app();

        let response = app.handle("/api/media/1");
        assert_eq!(response.status, 200);
        let Body::Bytes(bytes) = &response.body else {
            panic!("expected JSON body");
        };
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(value["url"], "http://media.test/asset/1");

        assert_eq!(app.handle("/uploads/photo.png").status, 200);
        assert_eq!(app.handle("/nothing/here").status, 404);
        assert_eq!(app.handle("/asset/99").status, 404);
    }

    #[test]
    fn test_rewriting_restored_per_request() {
        let (_dir, app) = app();
        let ctx = RequestContext::new();

        // An asset request disables rewriting for its own context only
        assert_eq!(app.handle("/asset/1").status, 200);
        assert_eq!(
            app.host().attachment_url(&ctx, crate::media::AssetId::new(1)).as_deref(),
            Some("http://media.test/asset/1")
        );
    }
}
