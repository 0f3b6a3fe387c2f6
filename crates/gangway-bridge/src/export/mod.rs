//! Export Control
//!
//! Two cooperating pieces decide what native code may touch:
//! [`ExportPolicy`], the namespace-scoped "is export marking required"
//! table, and [`ExposureEvaluator`], which combines the policy verdict with
//! registration-time export markers on types, enclosing types, and members.

mod evaluator;
mod policy;

pub use evaluator::{ExposureEvaluator, BRIDGE_TYPE_NAME};
pub use policy::ExportPolicy;
