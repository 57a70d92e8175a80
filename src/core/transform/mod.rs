//! Element transformation
//!
//! Resolves the elements of an entry into payload files, JSON dumps and CSV
//! extracts under the entry folder, each paired with a content-addressed
//! File node.
//!
//! | Kind | Files written | File nodes |
//! |---|---|---|
//! | FILE, IMAGE | `<element_id>.json`, `<element_id>` | payload |
//! | TABLE, WELL_PLATE | `<record_id>`, one `<generated_id>` per sheet | dump + extracts |
//! | DATA | `<record_id>` | dump |
//! | TEXT | `<element_id>.json` | none; content goes to the Dataset text |

pub mod element;
pub mod idgen;
pub mod sheets;

pub use element::{ElementOutcome, ElementTransformer, ResolvedEntry, SkippedElement};
pub use idgen::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use sheets::{decompose_table, SheetExtract, TableExtracts};
