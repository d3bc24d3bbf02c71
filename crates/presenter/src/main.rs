//! Console front-end: replays an order fixture through the presenter.
//!
//! Usage: `webpos-console <fixture.json>`
//!
//! ```json
//! {
//!   "categories": [{"id": 1, "name": "Bar", "priority": 0}],
//!   "items": [{"id": 4, "category": 1, "name": "Coffee", "qty": 2, "price": "1.20"}],
//!   "customer": "Maria",
//!   "response": {"bill_id": 17, "total": "2.40"}
//! }
//! ```
//!
//! A missing or `null` response replays a server that never answered.

use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::Value;

use webpos_billing::{
    Bill, BillRow, BillSubmission, Categories, Category, ConfirmedBill, OrderLineItem,
    OrderModel, SubmissionResponse,
};
use webpos_core::CategoryId;
use webpos_presenter::{
    AlertSink, BillPrinter, BillTransport, BillView, OrderPresenter, PresenterConfig, PrintError,
    ProductButton, SubmissionOutcome, TransportError, UiAction,
};

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    categories: Vec<Category>,
    items: Vec<OrderLineItem>,
    #[serde(default)]
    customer: String,
    #[serde(default)]
    response: Option<Value>,
}

struct ConsoleView;

impl BillView for ConsoleView {
    fn render_bill(&mut self, rows: &[BillRow]) {
        println!();
        for row in rows {
            match row {
                BillRow::Separator => println!("{}", "-".repeat(40)),
                BillRow::CategoryHeader { name } => println!("[{name}]"),
                BillRow::Item {
                    id,
                    name,
                    quantity,
                    price,
                } => println!("{id:>4} {name:<20} x{quantity:<3} {price:>10}"),
                BillRow::Total { amount } => println!("{:<29} {amount:>10}", "TOTAL"),
            }
        }
    }

    fn set_print_enabled(&mut self, enabled: bool) {
        tracing::debug!(enabled, "print trigger");
    }

    fn set_category_filtered(&mut self, category: CategoryId, filtered: bool) {
        tracing::debug!(%category, filtered, "category filter");
    }
}

struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn show_alert(&mut self, text: &str) {
        eprintln!("ALERT: {}", text.replace("<p>", "").replace("</p>", " - "));
    }

    fn hide_alert(&mut self) {}
}

struct ConsolePrinter;

impl BillPrinter for ConsolePrinter {
    fn print(&mut self, bill: &Bill, confirmation: &ConfirmedBill) -> Result<(), PrintError> {
        println!(
            "printed bill {} ({} lines, customer {})",
            confirmation.bill_id,
            bill.items.len(),
            confirmation.customer_id.as_deref().unwrap_or("-")
        );
        Ok(())
    }
}

#[derive(Default)]
struct RecordingTransport {
    sent: Vec<BillSubmission>,
}

impl BillTransport for RecordingTransport {
    fn send(&mut self, submission: &BillSubmission) -> Result<(), TransportError> {
        self.sent.push(submission.clone());
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    webpos_observability::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: webpos-console <fixture.json>");
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let fixture: Fixture =
        serde_json::from_str(&raw).with_context(|| format!("parsing fixture {path}"))?;

    let categories: Categories = fixture.categories.into_iter().collect();
    let mut presenter = OrderPresenter::new(
        OrderModel::new(categories),
        ConsoleView,
        ConsoleAlerts,
        ConsolePrinter,
        RecordingTransport::default(),
        PresenterConfig::from_env(),
    );

    for item in fixture.items {
        let button = ProductButton {
            id: item.id,
            category: item.category,
            name: item.name,
            price: item.unit_price,
        };
        let product_id = button.id;
        presenter.handle(UiAction::OrderProduct(button))?;
        for _ in 1..item.quantity {
            presenter.handle(UiAction::IncrementProduct(product_id))?;
        }
    }

    presenter.handle(UiAction::CustomerNameChanged(fixture.customer))?;
    presenter.handle(UiAction::PrintBill)?;

    let Some(submission_id) = presenter.pending_submission() else {
        println!("nothing submitted (empty bill or customer name too short)");
        return Ok(());
    };
    if let Some(sent) = presenter.transport().sent.last() {
        println!(
            "submitted {} lines for {:?}, total {}",
            sent.items.len(),
            sent.customer_name,
            sent.total
        );
    }

    // A body that does not parse is the same as no body.
    let response = fixture
        .response
        .and_then(|body| SubmissionResponse::parse(&body.to_string()));

    match presenter.complete_submission(submission_id, Ok(response))? {
        SubmissionOutcome::Printed(confirmed) => println!("accepted as bill {}", confirmed.bill_id),
        SubmissionOutcome::Rejected(rejection) => println!("rejected: {rejection}"),
        SubmissionOutcome::TransportFailed(err) => println!("transport failed: {err}"),
    }

    Ok(())
}
