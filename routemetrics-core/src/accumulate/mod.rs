//! Per-type record accumulators and run assembly.
//!
//! Each record type has one stateful collector; a run is the span
//! between one `header` record and the next (or EOF). Dispatch into
//! the collectors is a `match` on the payload enum, so a record can
//! never reach a collector of the wrong type.

mod eventloop;
mod gc;
mod header;
mod logs;
mod proc;
mod route;
mod run;
mod span;

pub use eventloop::{EventLoopAccumulator, EventLoopSummary};
pub use gc::{GcAccumulator, GcSummary};
pub use header::HeaderAccumulator;
pub use logs::EventLog;
pub use proc::{GaugeSummary, ProcAccumulator, ProcSummary};
pub use route::{RawRouteGroup, RouteAccumulator, RouteObservation};
pub use run::{RunBuilder, RunSummary, UnknownRecord};
pub use span::TimeSpan;
