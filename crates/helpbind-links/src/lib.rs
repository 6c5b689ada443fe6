//! Link passes over assembled helpbind documents.
//!
//! - **Normalization**: family-aware rewriting of raw targets into published paths
//!   ([`normalize_target_path`]) and online URLs ([`OnlineSite`], [`OnlineLinker`])
//! - **Resolution**: block-aware link rewriting with fragment canonicalization and a global
//!   fallback ([`LinkResolver`])
//! - **Dedupe**: a final pass making explicit anchor ids unique ([`dedupe_anchors`])
//! - **Validation**: fragment references checked against the anchors present
//!   ([`validate_document`])
//! - **Extras**: the external-links variant, commented-link unwrapping and image unification
//!
//! ```
//! use helpbind_links::{OnlineLinker, OnlineSite, PrefixSubfolders};
//!
//! let site = OnlineSite::new("https://docs.example.com", "Content_25.4_Documentation");
//! let inference = PrefixSubfolders::default();
//! let linker = OnlineLinker::new(&site, &inference);
//! assert_eq!(
//!     linker.url_for("../../Actions/Query/Query.htm", None),
//!     "https://docs.example.com/Content_25.4_Documentation/Help/Content/Actions/Query/Query.htm"
//! );
//! ```

#![warn(missing_docs)]

mod assets;
mod comments;
mod dedupe;
mod error;
mod external;
mod family;
mod normalize;
mod report;
mod resolve;
mod scan;
mod url;
mod validate;

pub use assets::{AssetLocator, AssetUnifier, FsAssetLocator, MissingAsset, UnifiedAssets};
pub use comments::unwrap_commented_links;
pub use dedupe::{AnchorChange, Deduplication, dedupe_anchors};
pub use error::LinkError;
pub use external::{build_external, format_external};
pub use family::{DocFamily, GUIDE_SUBFOLDERS};
pub use normalize::{Normalized, Rule, normalize_target_path, strip_rel_and_ext};
pub use report::{
    MISSING_REPORT, UNRESOLVED_REPORT, read_document, render_report, write_document,
    write_report,
};
pub use resolve::{
    LinkResolver, Resolution, ResolveMode, UnresolvedLink, canonical_fragment, join_relative,
};
pub use scan::{LinkKind, LinkSite, is_external, scan_links};
pub use url::{
    OnlineLinker, OnlineSite, PrefixSubfolders, SubfolderInference, encode_path, license_site,
};
pub use validate::{MissingAnchor, ValidationReport, validate_document};
