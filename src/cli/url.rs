//! `fastimg url`: show what the host generates for an asset.
//!
//! Prints the rewritten attachment URL, the image src for the requested
//! size, and the filtered metadata as one JSON document.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::hooks::{ImageSrc, SizeArg};
use crate::host::MediaHost;
use crate::media::{AssetId, AttachmentMetadata};
use crate::rewrite::RequestContext;
use crate::sizes::{FULL, SizeRegistry};

#[derive(Debug, Serialize)]
struct UrlReport {
    id: AssetId,
    url: String,
    size: SizeArg,
    image_src: Option<ImageSrc>,
    metadata: Option<AttachmentMetadata>,
}

/// Parse `-s`: registered names stay names, `300x200` becomes dimensions.
pub fn parse_size(raw: &str, sizes: &SizeRegistry) -> SizeArg {
    if sizes.get(raw).is_some() {
        return SizeArg::from(raw);
    }
    let dims: Option<Vec<u32>> = raw
        .split_once('x')
        .and_then(|(w, h)| Some(vec![w.parse().ok()?, h.parse().ok()?]));
    match dims {
        Some(dims) => SizeArg::Dimensions(dims),
        None => SizeArg::from(raw),
    }
}

pub fn print_urls(host: &MediaHost, id: u64, size: Option<&str>) -> Result<()> {
    let id = AssetId::new(id);
    let ctx = RequestContext::new();

    let Some(url) = host.attachment_url(&ctx, id) else {
        bail!("asset {id} is not in the media library");
    };
    let size = parse_size(size.unwrap_or(FULL), host.sizes());

    let report = UrlReport {
        id,
        url,
        image_src: host.image_src(&ctx, id, size.clone()),
        metadata: host.attachment_metadata(&ctx, id),
        size,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
