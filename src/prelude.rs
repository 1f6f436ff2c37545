//! Internal prelude, re-exported by every module in this crate.

pub(crate) use std::fmt;
