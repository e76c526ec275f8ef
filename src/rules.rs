//! Built-in grammars.
//!
//! `classes` holds the shared single-character rules and runs built from
//! them; `rfc1035` assembles those into the label and subdomain grammars.
//! Everything here goes through the public builder surface on
//! [`crate::Grammar`], so these modules double as worked examples for
//! writing grammars of your own.

#[path = "rules/classes.rs"]
pub mod classes;
#[path = "rules/rfc1035.rs"]
pub mod rfc1035;
