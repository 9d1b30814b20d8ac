//! Integration tests for the skiff binary
//!
//! These exercise the real CLI surface without touching any cloud provider:
//! configuration errors and preflight failures fire before the first
//! provider call.
