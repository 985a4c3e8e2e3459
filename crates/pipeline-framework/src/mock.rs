//! # Mock Stage & Testing Guide
//!
//! `MockStage<I, O>` implements [`Stage`] from a script of expectations. It
//! lets you drive a real [`Worker`](crate::Worker) through success, error and
//! panic paths without writing a bespoke stage for every test.
//!
//! ## When to use MockStage vs a real stage
//!
//! | Feature | MockStage | Real stage |
//! |---------|-----------|------------|
//! | **Determinism** | Scripted per item | Depends on stage logic |
//! | **Error Injection** | Easy (`return_err`, `panic_with`) | Hard (needs bad input) |
//! | **Use Case** | Testing the worker loop and its failure policy | Testing the domain transformation |
//!
//! ## Example
//!
//! ```rust
//! use pipeline_framework::mock::MockStage;
//! use pipeline_framework::{BroadcastHub, Worker};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut stage = MockStage::new();
//!     stage.expect(1).return_err("bad item");
//!     stage.expect(2).return_ok("good item");
//!     let script = stage.clone();
//!
//!     let hub = BroadcastHub::new();
//!     let mut out = hub.subscribe();
//!     let (worker, queue) = Worker::new(stage, hub);
//!     let handle = tokio::spawn(worker.run(CancellationToken::new()));
//!
//!     queue.enqueue(1).unwrap();
//!     queue.enqueue(2).unwrap();
//!     assert_eq!(out.recv().await, Some("good item"));
//!
//!     drop(queue);
//!     handle.await.unwrap();
//!     script.verify();
//! }
//! ```

use crate::stage::Stage;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// Scripted behaviour for one expected item.
enum Expectation<I, O> {
    Ok { input: I, output: O },
    Err { input: I, message: String },
    Panic { input: I, message: String },
}

/// Error returned by a [`MockStage`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MockError {
    /// The expectation asked for a failure.
    #[error("Scripted failure: {0}")]
    Scripted(String),
    /// The item did not match the next expectation, or none was left.
    #[error("Unexpected input: {0}")]
    Unexpected(String),
}

/// A stage that replays a script of expectations in order.
///
/// Clones share the same script, so keep one clone to call
/// [`verify`](MockStage::verify) after the stage has moved into a worker.
pub struct MockStage<I, O> {
    expectations: Arc<Mutex<VecDeque<Expectation<I, O>>>>,
}

impl<I, O> Clone for MockStage<I, O> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
        }
    }
}

impl<I, O> Default for MockStage<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> MockStage<I, O> {
    /// Creates a mock stage with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Expects `input` as the next processed item.
    pub fn expect(&mut self, input: I) -> ExpectationBuilder<I, O> {
        ExpectationBuilder {
            input,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder<I, O> {
    input: I,
    expectations: Arc<Mutex<VecDeque<Expectation<I, O>>>>,
}

impl<I, O> ExpectationBuilder<I, O> {
    /// The item produces `output`.
    pub fn return_ok(self, output: O) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Ok {
            input: self.input,
            output,
        });
    }

    /// The item fails with a [`MockError::Scripted`].
    pub fn return_err(self, message: impl Into<String>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Err {
            input: self.input,
            message: message.into(),
        });
    }

    /// Processing the item panics with `message`.
    pub fn panic_with(self, message: impl Into<String>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Panic {
            input: self.input,
            message: message.into(),
        });
    }
}

#[async_trait]
impl<I, O> Stage for MockStage<I, O>
where
    I: PartialEq + Send + Sync + Debug + 'static,
    O: Clone + Send + Debug + 'static,
{
    type Input = I;
    type Output = O;
    type Error = MockError;

    async fn process(&mut self, input: &I) -> Result<O, MockError> {
        let next = self.expectations.lock().unwrap().pop_front();

        match next {
            Some(Expectation::Ok { input: expected, output }) if expected == *input => Ok(output),
            Some(Expectation::Err { input: expected, message }) if expected == *input => {
                Err(MockError::Scripted(message))
            }
            Some(Expectation::Panic { input: expected, message }) if expected == *input => {
                panic!("{message}")
            }
            _ => Err(MockError::Unexpected(format!("{input:?}"))),
        }
    }
}
