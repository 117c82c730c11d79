pub mod orchestration;

pub use orchestration::{run_build, run_compute, run_resolve, BuildArgs, ComputeArgs, ResolveArgs};
