//! TOC definition parsing and tree linearization.
//!
//! Help bundles describe their table of contents as a hierarchy document plus one or more
//! chunk documents, each a `define({...})` call written in a permissive JavaScript
//! object-literal dialect. This crate:
//!
//! - tokenizes and parses that dialect with documented tolerance stages ([`parse_definition`])
//! - merges chunk documents into an id → page table ([`IdTable`])
//! - builds the node tree of a hierarchy document ([`build_tree`])
//! - flattens the tree into pre-order page order with nesting depths ([`Linearizer`])
//! - persists and re-reads the resulting outline files ([`write_outline`])
//!
//! # Example
//!
//! ```
//! use helpbind_toc::{IdTable, Linearizer, MemoryPageSource, NoExclusions, build_tree, parse_definition};
//!
//! let (chunk, _) = parse_definition("define({'/Content/a.htm': {i: [0], t: ['A']}});").unwrap();
//! let (tree, _) = parse_definition("define({tree: {n: [{i: 0, c: 0}]}});").unwrap();
//!
//! let mut table = IdTable::new();
//! table.merge_chunk(&chunk).unwrap();
//! let roots = build_tree(&tree, &table).unwrap();
//!
//! let pages = MemoryPageSource::new().with_page("Content/a.md", "# A\n");
//! let result = Linearizer::new(&pages, &NoExclusions).linearize(&roots);
//! assert_eq!(result.pages[0].relative_path, "Content/a.md");
//! ```

#![warn(missing_docs)]

mod chunk;
mod define;
mod discover;
mod error;
mod hierarchy;
mod lexer;
mod linearize;
mod outline;
mod parser;
mod source;
mod value;

pub use chunk::{IdTable, PageInfo};
pub use define::{Stage, parse_definition};
pub use discover::{
    LoadedToc, TOC_DIR, TocPair, discover_pairs, load_bundle, load_pairs, read_definition,
    toc_dir,
};
pub use error::{LexError, ParseError, TocError};
pub use hierarchy::{TocNode, build_tree};
pub use lexer::{Spanned, Token, tokenize};
pub use linearize::{
    ExcludePage, LinearPage, Linearization, Linearizer, NoExclusions, NodeOutcome, TocDiagnostic,
    page_path_for_target,
};
pub use outline::{
    HIERARCHY_FILE, TOC_FILE, parse_hierarchy, read_hierarchy, render_hierarchy, render_toc,
    write_outline,
};
pub use parser::{parse_call, parse_value};
pub use source::{FsPageSource, MemoryPageSource, PageSource};
pub use value::Value;
