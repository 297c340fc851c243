//! Router-addressable attachment URLs.
//!
//! Registered last on the three URL/metadata filters, so whatever other
//! callbacks produce, the final answer points at `asset/...`.

use std::sync::Arc;

use crate::hooks::{Hooks, ImageSrc, ImageSrcArgs, PRIORITY_LAST};
use crate::host::home_url;
use crate::media::{AssetId, AttachmentMetadata};
use crate::route::asset_path;

use super::RequestContext;

/// Rewrites attachment URLs and metadata to go through the asset router.
#[derive(Debug, Clone)]
pub struct RewriteAttachments {
    base_url: String,
}

impl RewriteAttachments {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Subscribe to the URL and metadata filters at [`PRIORITY_LAST`].
    pub fn register(self, hooks: &mut Hooks) {
        let this = Arc::new(self);

        let rewrite = Arc::clone(&this);
        hooks
            .attachment_url
            .add(PRIORITY_LAST, move |ctx, url, id| rewrite.attachment_url(ctx, url, *id));

        let rewrite = Arc::clone(&this);
        hooks
            .image_src
            .add(PRIORITY_LAST, move |ctx, src, args| rewrite.image_src(ctx, src, args));

        let rewrite = this;
        hooks
            .attachment_metadata
            .add(PRIORITY_LAST, move |ctx, meta, id| rewrite.attachment_metadata(ctx, meta, *id));
    }

    /// `attachment_url` callback: `asset/<id>`.
    pub fn attachment_url(&self, ctx: &RequestContext, url: String, id: AssetId) -> String {
        let guard = ctx.guard();
        if !guard.is_enabled() {
            return url;
        }
        let Some(_lock) = guard.try_lock() else {
            return url;
        };
        self.router_url(id, None)
    }

    /// `image_src` callback: `asset/<size>/<id>`, keeping the dimensions.
    pub fn image_src(
        &self,
        ctx: &RequestContext,
        mut src: ImageSrc,
        args: &ImageSrcArgs,
    ) -> ImageSrc {
        let guard = ctx.guard();
        if !guard.is_enabled() {
            return src;
        }
        let size = args.size.first();
        let Some(_lock) = guard.try_lock() else {
            return src;
        };
        src.url = self.router_url(args.id, size.as_deref());
        src
    }

    /// `attachment_metadata` callback: key every file by the asset id.
    ///
    /// Applies whether or not rewriting is enabled.
    pub fn attachment_metadata(
        &self,
        _ctx: &RequestContext,
        mut meta: AttachmentMetadata,
        id: AssetId,
    ) -> AttachmentMetadata {
        let id = id.to_string();
        meta.file.clone_from(&id);
        for size in meta.sizes.values_mut() {
            size.file.clone_from(&id);
        }
        meta
    }

    fn router_url(&self, id: AssetId, size: Option<&str>) -> String {
        home_url(&self.base_url, &asset_path(id, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{PRIORITY_DEFAULT, SizeArg};
    use crate::media::SizeMetadata;
    use std::collections::BTreeMap;

    const BASE: &str = "https://example.com";

    fn hooks() -> Hooks {
        let mut hooks = Hooks::new();
        RewriteAttachments::new(BASE).register(&mut hooks);
        hooks
    }

    fn native_src() -> ImageSrc {
        ImageSrc {
            url: "https://example.com/uploads/photo-300x200.jpg".into(),
            width: 300,
            height: 200,
            intermediate: true,
        }
    }

    fn metadata() -> AttachmentMetadata {
        let mut sizes = BTreeMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            SizeMetadata {
                file: "photo-150x150.jpg".into(),
                width: 150,
                height: 150,
                mime_type: "image/jpeg".into(),
            },
        );
        AttachmentMetadata {
            file: "2024/05/photo.jpg".into(),
            width: 600,
            height: 400,
            mime_type: "image/jpeg".into(),
            sizes,
        }
    }

    #[test]
    fn test_attachment_url_rewritten() {
        let ctx = RequestContext::new();
        let url = hooks()
            .attachment_url
            .apply(&ctx, "https://example.com/uploads/photo.jpg".into(), &AssetId::new(42));
        assert_eq!(url, "https://example.com/asset/42");
        assert!(!ctx.guard().is_locked());
    }

    #[test]
    fn test_image_src_rewritten() {
        let ctx = RequestContext::new();
        let args = ImageSrcArgs {
            id: AssetId::new(7),
            size: SizeArg::from("medium"),
        };
        let src = hooks().image_src.apply(&ctx, native_src(), &args);

        assert_eq!(src.url, "https://example.com/asset/medium/7");
        assert_eq!((src.width, src.height), (300, 200));
    }

    #[test]
    fn test_image_src_dimensions_use_first_element() {
        let ctx = RequestContext::new();
        let args = ImageSrcArgs {
            id: AssetId::new(7),
            size: SizeArg::Dimensions(vec![300, 200]),
        };
        let src = hooks().image_src.apply(&ctx, native_src(), &args);
        assert_eq!(src.url, "https://example.com/asset/300/7");
    }

    #[test]
    fn test_disabled_passes_through() {
        let ctx = RequestContext::new();
        ctx.guard().disable();
        let hooks = hooks();

        let native = "https://example.com/uploads/photo.jpg".to_string();
        let url = hooks.attachment_url.apply(&ctx, native.clone(), &AssetId::new(42));
        assert_eq!(url, native);

        let args = ImageSrcArgs {
            id: AssetId::new(42),
            size: SizeArg::from("thumbnail"),
        };
        assert_eq!(hooks.image_src.apply(&ctx, native_src(), &args), native_src());
    }

    #[test]
    fn test_reentrant_call_passes_through() {
        let ctx = RequestContext::new();
        let hooks = hooks();
        let native = "https://example.com/uploads/photo.jpg".to_string();

        // Inside an outer rewrite the nested call must not recompute
        let outer = ctx.guard().try_lock().unwrap();
        let nested = hooks.attachment_url.apply(&ctx, native.clone(), &AssetId::new(42));
        assert_eq!(nested, native);
        drop(outer);

        let once = hooks.attachment_url.apply(&ctx, native, &AssetId::new(42));
        let twice = hooks.attachment_url.apply(&ctx, once.clone(), &AssetId::new(42));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_generation_inside_callback() {
        // A lower-priority callback that itself asks for the URL again,
        // the way a host helper might while building a URL.
        let rewrite = RewriteAttachments::new(BASE);
        let mut hooks = Hooks::new();
        let inner = rewrite.clone();
        hooks.attachment_url.add(PRIORITY_DEFAULT, move |ctx, url, id| {
            let _lock = ctx.guard().try_lock();
            inner.attachment_url(ctx, url, *id)
        });
        rewrite.register(&mut hooks);

        let ctx = RequestContext::new();
        let url = hooks
            .attachment_url
            .apply(&ctx, "native".into(), &AssetId::new(3));
        assert_eq!(url, "https://example.com/asset/3");
        assert!(!ctx.guard().is_locked());
    }

    #[test]
    fn test_metadata_rewritten_even_when_disabled() {
        let hooks = hooks();

        let enabled = RequestContext::new();
        let meta = hooks.attachment_metadata.apply(&enabled, metadata(), &AssetId::new(9));
        assert_eq!(meta.file, "9");
        assert_eq!(meta.sizes["thumbnail"].file, "9");

        let disabled = RequestContext::new();
        disabled.guard().disable();
        let meta = hooks.attachment_metadata.apply(&disabled, metadata(), &AssetId::new(9));
        assert_eq!(meta.file, "9");
        assert_eq!(meta.sizes["thumbnail"].file, "9");
        assert_eq!(meta.width, 600);
    }
}
