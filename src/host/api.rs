//! Host routes: media JSON API and native uploads.
//!
//! | Path                   | Response                                 |
//! |------------------------|------------------------------------------|
//! | `api/media/<id>`       | [`MediaInfo`] as JSON                    |
//! | `<uploads>/<file>`     | the stored file                          |
//! | anything else          | 404                                      |

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::{MediaHost, resolve_upload};
use crate::hooks::{ImageSrc, SizeArg};
use crate::media::{AssetId, AttachmentMetadata};
use crate::rewrite::RequestContext;
use crate::route::{AssetResponse, Body, CONTENT_TYPE, normalize};
use crate::sizes::FULL;
use crate::utils::mime::{self, types};
use crate::{debug, log};

const API_PREFIX: &str = "api/media/";

/// Everything the host exposes about one asset.
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub id: AssetId,
    pub mime_type: String,
    pub url: String,
    /// Every available size, plus `full`, for images.
    pub sizes: BTreeMap<String, ImageSrc>,
    pub metadata: AttachmentMetadata,
}

impl MediaHost {
    /// Collect [`MediaInfo`] for `id` through the filters.
    pub fn media_info(&self, ctx: &RequestContext, id: AssetId) -> Option<MediaInfo> {
        let url = self.attachment_url(ctx, id)?;

        // Size names come from the unfiltered record; filtered metadata is
        // keyed by id and no longer names files.
        let stored = self.stored_metadata(id)?;
        let sizes = stored
            .sizes
            .keys()
            .map(String::as_str)
            .chain([FULL])
            .filter_map(|name| {
                let src = self.image_src(ctx, id, SizeArg::from(name))?;
                Some((name.to_string(), src))
            })
            .collect();

        let metadata = self.attachment_metadata(ctx, id)?;
        Some(MediaInfo {
            id,
            mime_type: stored.mime_type,
            url,
            sizes,
            metadata,
        })
    }

    /// Handle a request the asset router did not match.
    pub fn handle(&self, ctx: &RequestContext, request_path: &str, root: &Path) -> AssetResponse {
        let path = normalize(request_path);

        if let Some(raw_id) = path.strip_prefix(API_PREFIX) {
            return self.respond_media(ctx, raw_id);
        }

        if let Some(rest) = path
            .strip_prefix(self.uploads())
            .and_then(|rest| rest.strip_prefix('/'))
            && let Some(file) = resolve_upload(rest, root)
        {
            return AssetResponse {
                status: 200,
                headers: vec![(CONTENT_TYPE, mime::from_path(&file).to_string())],
                body: Body::File(file),
            };
        }

        AssetResponse::not_found()
    }

    fn respond_media(&self, ctx: &RequestContext, raw_id: &str) -> AssetResponse {
        let Ok(id) = raw_id.parse::<AssetId>() else {
            debug!("api"; "invalid asset id `{}`", raw_id);
            return AssetResponse::not_found();
        };
        let Some(info) = self.media_info(ctx, id) else {
            return AssetResponse::not_found();
        };

        match serde_json::to_vec_pretty(&info) {
            Ok(body) => AssetResponse {
                status: 200,
                headers: vec![(CONTENT_TYPE, types::JSON.to_string())],
                body: Body::Bytes(body),
            },
            Err(err) => {
                log!("api"; "failed to serialize asset {}: {}", id, err);
                AssetResponse {
                    status: 500,
                    headers: Vec::new(),
                    body: Body::Empty,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Hooks;
    use crate::media::{ManifestEntry, MediaLibrary};
    use crate::rewrite::RewriteAttachments;
    use crate::sizes::SizeRegistry;
    use image::RgbImage;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn host() -> (TempDir, MediaHost) {
        let dir = TempDir::new().unwrap();
        RgbImage::new(400, 300).save(dir.path().join("photo.png")).unwrap();

        let library = MediaLibrary::from_entries(
            dir.path(),
            vec![ManifestEntry {
                id: 3,
                file: "photo.png".into(),
                mime_type: None,
            }],
        );
        let mut hooks = Hooks::new();
        RewriteAttachments::new("http://localhost:5277").register(&mut hooks);

        let host = MediaHost::new(
            Arc::new(library),
            Arc::new(SizeRegistry::with_builtins()),
            Arc::new(hooks),
            "http://localhost:5277",
            "uploads",
        );
        (dir, host)
    }

    fn json(response: &AssetResponse) -> serde_json::Value {
        let Body::Bytes(bytes) = &response.body else {
            panic!("expected JSON body");
        };
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_media_api_rewritten() {
        let (dir, host) = host();
        let ctx = RequestContext::new();

        let response = host.handle(&ctx, "/api/media/3", dir.path());
        assert_eq!(response.status, 200);
        assert_eq!(response.header(CONTENT_TYPE), Some(types::JSON));

        let value = json(&response);
        assert_eq!(value["id"], 3);
        assert_eq!(value["mime_type"], "image/png");
        assert_eq!(value["url"], "http://localhost:5277/asset/3");
        assert_eq!(value["sizes"]["thumbnail"]["url"], "http://localhost:5277/asset/thumbnail/3");
        assert_eq!(value["sizes"]["full"]["width"], 400);
        assert_eq!(value["metadata"]["file"], "3");
    }

    #[test]
    fn test_media_api_native_when_disabled() {
        let (dir, host) = host();
        let ctx = RequestContext::new();
        ctx.guard().disable();

        let value = json(&host.handle(&ctx, "/api/media/3", dir.path()));
        assert_eq!(value["url"], "http://localhost:5277/uploads/photo.png");
        assert_eq!(
            value["sizes"]["medium"]["url"],
            "http://localhost:5277/uploads/photo-300x225.png"
        );
        assert_eq!(value["metadata"]["file"], "3");
    }

    #[test]
    fn test_media_api_not_found() {
        let (dir, host) = host();
        let ctx = RequestContext::new();
        assert_eq!(host.handle(&ctx, "/api/media/9", dir.path()).status, 404);
        assert_eq!(host.handle(&ctx, "/api/media/abc", dir.path()).status, 404);
    }

    #[test]
    fn test_uploads_served() {
        let (dir, host) = host();
        let ctx = RequestContext::new();

        let response = host.handle(&ctx, "/uploads/photo.png", dir.path());
        assert_eq!(response.status, 200);
        assert_eq!(response.header(CONTENT_TYPE), Some("image/png"));
        assert!(matches!(response.body, Body::File(_)));

        assert_eq!(host.handle(&ctx, "/uploads/../photo.png", dir.path()).status, 404);
        assert_eq!(host.handle(&ctx, "/uploadsphoto.png", dir.path()).status, 404);
        assert_eq!(host.handle(&ctx, "/", dir.path()).status, 404);
    }
}
