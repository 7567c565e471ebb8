//! howto-search - validation and typo-tolerant search for how-to guides.
//!
//! Guides are loaded from JSON content files, validated all-or-nothing into
//! an immutable [`Corpus`], and searched with intent-aware synonym
//! expansion plus edit-distance matching, so "screnshot" or
//! "Bildschirmfoto" still find the screenshot guide for every OS.
//!
//! # Quick start
//!
//! ```no_run
//! use howto_search::{ContentDir, Corpus};
//! use howto_search::search::{self, SearchOptions};
//!
//! let content_dir = ContentDir::resolve(None).unwrap();
//! let corpus = Corpus::load(content_dir.root()).unwrap();
//!
//! let response = search::search_how_tos(
//!     "screnshot",
//!     corpus.guides(),
//!     &SearchOptions::default(),
//! );
//! for item in &response.items {
//!     println!("{} (score: {:.3})", item.guide.slug, item.score);
//! }
//! ```

pub mod cli;
pub mod content_dir;
pub mod corpus;
pub mod error;
pub mod intent;
pub mod model;
pub mod search;
pub mod text_util;
pub mod validate;
pub mod walker;

pub use content_dir::ContentDir;
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use intent::{DEFAULT_INTENTS, IntentDictionary};
pub use model::{Guide, Media, OsFamily, Step};
pub use validate::{ValidationErrors, validate_how_to, validate_how_to_list};
