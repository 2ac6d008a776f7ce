//! Freshness audit logic for the Engineering Codex.
//!
//! Everything here is pure decision logic over already-loaded content:
//! frontmatter parsing, calendar-month age, the staleness classifier, the
//! technology reference scanner, the industry-shift phase (behind the
//! `ShiftSearch` port), report assembly and internal link validation.
//! Filesystem and network adapters live in `codex-infra`.

pub mod audit;
pub mod calendar;
pub mod category;
pub mod classifier;
pub mod corpus;
pub mod frontmatter;
pub mod links;
pub mod report;
pub mod scanner;
pub mod shift;
