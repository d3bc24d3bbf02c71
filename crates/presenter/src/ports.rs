//! Collaborators the presenter drives.

use webpos_billing::{Bill, BillRow, BillSubmission, ConfirmedBill};
use webpos_core::CategoryId;

use crate::error::{PrintError, TransportError};

/// The till screen.
pub trait BillView {
    /// Replace the bill table with `rows`.
    fn render_bill(&mut self, rows: &[BillRow]);

    /// Enable or disable the "print bill" trigger.
    fn set_print_enabled(&mut self, enabled: bool);

    /// Hide (`filtered = true`) or show the product buttons of a category.
    fn set_category_filtered(&mut self, category: CategoryId, filtered: bool);
}

/// The alert popup.
pub trait AlertSink {
    fn show_alert(&mut self, text: &str);

    fn hide_alert(&mut self);
}

/// Produces the paper/PDF bill once the server confirmed it.
pub trait BillPrinter {
    fn print(&mut self, bill: &Bill, confirmation: &ConfirmedBill) -> Result<(), PrintError>;
}

/// Delivers a bill commit to the server.
///
/// `send` only starts the request. The transport owner reports the outcome
/// exactly once through [`crate::OrderPresenter::complete_submission`]; an
/// `Err` here means the request never left and no completion will follow.
pub trait BillTransport {
    fn send(&mut self, submission: &BillSubmission) -> Result<(), TransportError>;
}
