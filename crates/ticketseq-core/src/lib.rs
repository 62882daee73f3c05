//! # ticketseq-core
//!
//! Core types for keeping ticket identifiers sequential across a set of
//! paired bilingual documents.
//!
//! This crate holds everything that does not walk a directory:
//! - [`TicketId`] — a `<PREFIX>-<N>` identifier
//! - Front-matter field locating and byte-preserving rewriting ([`frontmatter`])
//! - [`CounterRecord`] — the persisted "next identifier" bookkeeping file
//! - [`LayoutConfig`] — where documents and the counter live
//! - Error hierarchy ([`TicketError`])

pub mod config;
pub mod counter;
pub mod error;
pub mod frontmatter;
pub mod ticket;

pub use config::LayoutConfig;
pub use counter::CounterRecord;
pub use error::{Result, TicketError};
pub use frontmatter::{TicketField, TicketMatch};
pub use ticket::TicketId;
