//! End-to-end tests: fixture solutions driven through the dispatcher
//!
//! These exercise the whole request path - JSON-RPC request in, plain-text
//! tool result out - the way a stdio client would see it.

pub mod harness;

#[cfg(test)]
mod test_refactors;
#[cfg(test)]
mod test_scenarios;
