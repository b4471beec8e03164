//! Candidate selection utilities.

pub(crate) mod topk;
