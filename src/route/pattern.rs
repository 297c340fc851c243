//! Asset route patterns.
//!
//! ```text
//! asset/42                          Attachment { id: "42" }
//! asset/42-photo.jpg                Attachment { id: "42" }
//! asset/thumbnail/7                 Image { size: "thumbnail", id: "7" }
//! asset/thumbnail/7/my-photo.jpg    Image { size: "thumbnail", id: "7" }
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::media::AssetId;

/// Route prefix shared by both patterns.
pub const PREFIX: &str = "asset";

static ATTACHMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^asset/([0-9]+)[^/]*$").expect("valid attachment pattern"));

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^asset/([-_a-zA-Z0-9]+)/([0-9]+)[^/]*(?:/[^/]*)?$").expect("valid image pattern")
});

/// Capture groups of a matched request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// `asset/<id>`
    Attachment { id: String },
    /// `asset/<size>/<id>`
    Image { size: String, id: String },
}

impl RouteMatch {
    /// Match a raw request path. `None` if it is not an asset route.
    pub fn parse(request_path: &str) -> Option<Self> {
        let path = normalize(request_path);

        if let Some(caps) = ATTACHMENT.captures(&path) {
            return Some(Self::Attachment {
                id: caps[1].to_string(),
            });
        }

        IMAGE.captures(&path).map(|caps| Self::Image {
            size: caps[1].to_string(),
            id: caps[2].to_string(),
        })
    }

    /// The captured id, or `None` when it does not fit an [`AssetId`].
    pub fn asset_id(&self) -> Option<AssetId> {
        let (Self::Attachment { id } | Self::Image { id, .. }) = self;
        id.parse().ok()
    }
}

/// Strip query and fragment, percent-decode, trim slashes.
pub fn normalize(request_path: &str) -> String {
    let path = request_path
        .split(['?', '#'])
        .next()
        .unwrap_or(request_path);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path));
    decoded.trim_matches('/').to_string()
}

/// Router path for an asset: `asset/<id>` or `asset/<size>/<id>`.
pub fn asset_path(id: AssetId, size: Option<&str>) -> String {
    match size {
        Some(size) => format!("{PREFIX}/{size}/{id}"),
        None => format!("{PREFIX}/{id}"),
    }
}
