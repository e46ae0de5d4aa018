//! Event system: runtime events, handlers, dispatch, state-changed signal.

pub mod dispatch;
pub mod handler;
pub mod message;
pub mod signal;

pub use dispatch::{
    CompositionOrder, DispatchConfig, DispatchError, DispatchReport, Dispatcher, Outcome,
};
pub use handler::{HandlerContext, HandlerError, HandlerResult, HandlerTable};
pub use message::{Event, EventContext};
pub use signal::{ObserverId, StateChanged};
