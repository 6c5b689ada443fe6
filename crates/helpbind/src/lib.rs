//! helpbind: help bundle binder
//!
//! Converted help bundles arrive as thousands of small Markdown pages plus the TOC definitions
//! of the original help system. helpbind follows the TOC to stitch the pages into one document
//! per bundle, gives every page and heading a stable anchor, and rewrites cross-page links to
//! point at those anchors, or at the published online site when a link leaves the bundle.

#![warn(missing_docs)]

pub mod cli;
