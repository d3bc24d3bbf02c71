//! `webpos-billing`: bill model, rendering and submission validation.
//!
//! Everything here is deterministic domain logic: no UI, no transport. The
//! presenter feeds snapshots in and hands the resulting rows and verdicts to
//! its collaborators.

pub mod bill;
pub mod catalog;
pub mod config;
pub mod formatter;
pub mod model;
pub mod money;
pub mod order;
pub mod submission;

pub use bill::{Bill, BillItems};
pub use catalog::{Categories, Category, OrderLineItem};
pub use config::BillingConfig;
pub use formatter::{BillFormatter, BillRow, group_and_order};
pub use model::{BillChanged, OrderModel};
pub use money::{format_currency, line_total, parse_decimal};
pub use order::{
    AddProduct, ChangeQuantity, ClearBill, Order, OrderCommand, OrderEvent,
};
pub use submission::{
    BillSubmission, BillSubmissionValidator, ConfirmedBill, RejectionKind, Shortage,
    SubmissionRejection, SubmissionResponse,
};
