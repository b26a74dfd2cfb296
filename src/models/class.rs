//! Test class and operation descriptors.
//!
//! A `TestClass` is a named unit with an instance factory and an ordered set
//! of registered operations. The engine never inspects how classes or
//! operations were discovered; it only consumes these descriptors, so any
//! discovery mechanism (a registration macro, a hand-built table, generated
//! code) can feed the runner.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::failure::CapturedFailure;

/// A constructed instance of a class under test.
pub type Instance = Box<dyn Any>;

/// The future returned by an asynchronous operation, borrowing its inputs.
pub type OperationFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Value>>> + 'a>>;

type ConstructFn = Box<dyn Fn() -> Result<Instance>>;
type SyncFn = Box<dyn Fn(&mut dyn Any, &[Value]) -> Result<Option<Value>>>;
type AsyncFn = Box<dyn for<'a> Fn(&'a mut dyn Any, &'a [Value]) -> OperationFuture<'a>>;

/// How an operation executes once invoked.
pub enum OperationBody {
    /// Runs to completion on the calling thread and returns directly.
    Sync(SyncFn),
    /// Returns a future the engine awaits to completion before moving on.
    Async(AsyncFn),
    /// Declared asynchronous but yields no awaitable handle; the work would
    /// outlive the invocation untracked, so the engine refuses to run it.
    Detached(SyncFn),
}

/// One invocable operation registered on a test class.
pub struct Operation {
    name: String,
    body: OperationBody,
    unresolved_type_params: bool,
    tags: Vec<String>,
}

impl Operation {
    /// Register a synchronous operation.
    pub fn sync(
        name: impl Into<String>,
        call: impl Fn(&mut dyn Any, &[Value]) -> Result<Option<Value>> + 'static,
    ) -> Self {
        Self::with_body(name, OperationBody::Sync(Box::new(call)))
    }

    /// Register an asynchronous operation returning an awaitable future.
    pub fn asynchronous(
        name: impl Into<String>,
        start: impl for<'a> Fn(&'a mut dyn Any, &'a [Value]) -> OperationFuture<'a> + 'static,
    ) -> Self {
        Self::with_body(name, OperationBody::Async(Box::new(start)))
    }

    /// Register an asynchronous operation that yields no awaitable handle.
    ///
    /// Such operations are rejected by the invocation adapter before the body
    /// is ever called; the registration exists so discovery can still surface
    /// them as cases with a diagnosable failure.
    pub fn detached(
        name: impl Into<String>,
        call: impl Fn(&mut dyn Any, &[Value]) -> Result<Option<Value>> + 'static,
    ) -> Self {
        Self::with_body(name, OperationBody::Detached(Box::new(call)))
    }

    fn with_body(name: impl Into<String>, body: OperationBody) -> Self {
        Self {
            name: name.into(),
            body,
            unresolved_type_params: false,
            tags: Vec::new(),
        }
    }

    /// Mark the operation as generic with type parameters discovery could not
    /// resolve to concrete types. Invocation fails without running the body.
    pub fn with_unresolved_type_params(mut self) -> Self {
        self.unresolved_type_params = true;
        self
    }

    /// Attach opaque metadata tags carried through from discovery.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &OperationBody {
        &self.body
    }

    pub fn has_unresolved_type_params(&self) -> bool {
        self.unresolved_type_params
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("unresolved_type_params", &self.unresolved_type_params)
            .finish_non_exhaustive()
    }
}

/// A class under test: a name, an optional instance factory, and the ordered
/// operations discovery found on it.
pub struct TestClass {
    name: String,
    factory: Option<ConstructFn>,
    operations: Vec<Arc<Operation>>,
}

impl TestClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factory: None,
            operations: Vec::new(),
        }
    }

    /// Register the factory lifecycles use to construct instances.
    pub fn factory(mut self, factory: impl Fn() -> Result<Instance> + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Register an operation, preserving registration order.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(Arc::new(operation));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Construct an instance via the registered factory.
    ///
    /// A panicking factory is normalized to an error carrying the panic
    /// message, so lifecycles see the construction failure itself rather
    /// than an unwind payload.
    ///
    /// # Errors
    /// Returns an error if no factory is registered, or if the factory
    /// fails or panics.
    pub fn construct(&self) -> Result<Instance> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| anyhow!("no instance factory is registered for test class '{}'", self.name))?;

        match catch_unwind(AssertUnwindSafe(|| factory())) {
            Ok(instance) => instance,
            Err(payload) => Err(CapturedFailure::from_panic(payload).into_cause()),
        }
    }
}

impl fmt::Debug for TestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClass")
            .field("name", &self.name)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}
