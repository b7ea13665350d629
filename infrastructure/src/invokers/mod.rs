//! Remote invoker implementations
//!
//! - [`LocalInvoker`]: runs source handlers in-process
//! - [`LambdaInvoker`]: calls deployed AWS Lambda functions (feature `aws`)

#[cfg(feature = "aws")]
mod lambda;
mod local;

#[cfg(feature = "aws")]
pub use lambda::LambdaInvoker;
pub use local::LocalInvoker;
