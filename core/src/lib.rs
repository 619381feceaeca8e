// src/lib.rs

//! Stockflow: the step pipeline behind the inventory API.
//!
//! Every product operation (create, list, update, delete) is described as an
//! ordered list of named steps. Each step has one or more async handlers that
//! work on a shared `ContextData<T>`. A handler can:
//!  - continue to the next step or stop the pipeline early,
//!  - fail with the pipeline's error type, which aborts the run.
//!
//! Steps can be optional (no handler required) or carry a `skip_if` condition
//! evaluated against the context right before the step runs.

pub mod core;
pub mod error;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{Handler, SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

/*
    Typical usage:
    1. Define a context struct `MyCtx` holding the operation's inputs and outputs.
    2. Create a `Pipeline<MyCtx, MyError>` with its step names.
    3. Attach handlers with `.on_root("step", |ctx| Box::pin(async move { ... }))`.
    4. Wrap the initial context in `ContextData::new(..)` and call `pipeline.run(ctx.clone()).await`.
    5. Read results back out of the context after the run.
*/
