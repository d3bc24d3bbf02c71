//! `webpos-presenter`
//!
//! **Responsibility:** sit between the order model and the till screen.
//!
//! The presenter turns typed UI actions into model commands, re-renders the
//! bill whenever the model announces a change, drives bill submission and
//! reports problems through alerts. Screen, alert popup, printer and server
//! link are injected collaborators; nothing here touches a real UI.

pub mod alert;
pub mod config;
pub mod error;
pub mod event;
pub mod ports;
pub mod presenter;

pub use config::PresenterConfig;
pub use error::{PresenterError, PrintError, TransportError};
pub use event::{ActionKind, ProductButton, UiAction, UiEvent};
pub use ports::{AlertSink, BillPrinter, BillTransport, BillView};
pub use presenter::{OrderPresenter, SubmissionOutcome};
