//! The order presenter.

use std::collections::{BTreeSet, HashMap};

use webpos_billing::{
    Bill, BillChanged, BillFormatter, BillSubmissionValidator, ConfirmedBill, OrderModel,
    SubmissionRejection, SubmissionResponse,
};
use webpos_core::{CategoryId, DomainError, SubmissionId};
use webpos_events::Subscription;

use crate::alert;
use crate::config::PresenterConfig;
use crate::error::{PresenterError, TransportError};
use crate::event::{ActionKind, UiAction, UiEvent};
use crate::ports::{AlertSink, BillPrinter, BillTransport, BillView};

type Handler<V, A, P, T> =
    fn(&mut OrderPresenter<V, A, P, T>, UiAction) -> Result<(), PresenterError>;

/// How a completed submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Server confirmed the bill and it was printed.
    Printed(ConfirmedBill),
    /// Server answered but did not accept the bill.
    Rejected(SubmissionRejection),
    /// No answer could be obtained.
    TransportFailed(TransportError),
}

/// A submission sent and not yet answered.
#[derive(Debug, Clone)]
struct PendingSubmission {
    id: SubmissionId,
    bill: Bill,
}

pub struct OrderPresenter<V, A, P, T> {
    model: OrderModel,
    bill_updates: Subscription<BillChanged>,
    view: V,
    alerts: A,
    printer: P,
    transport: T,
    formatter: BillFormatter,
    validator: BillSubmissionValidator,
    config: PresenterConfig,
    customer_name: String,
    filtered: BTreeSet<CategoryId>,
    pending: Option<PendingSubmission>,
    handlers: HashMap<ActionKind, Handler<V, A, P, T>>,
}

impl<V, A, P, T> OrderPresenter<V, A, P, T>
where
    V: BillView,
    A: AlertSink,
    P: BillPrinter,
    T: BillTransport,
{
    pub fn new(
        model: OrderModel,
        view: V,
        alerts: A,
        printer: P,
        transport: T,
        config: PresenterConfig,
    ) -> Self {
        let bill_updates = model.subscribe();

        let mut handlers: HashMap<ActionKind, Handler<V, A, P, T>> = HashMap::new();
        handlers.insert(ActionKind::SelectCategory, Self::on_select_category);
        handlers.insert(ActionKind::OrderProduct, Self::on_order_product);
        handlers.insert(ActionKind::IncrementProduct, Self::on_increment_product);
        handlers.insert(ActionKind::DecrementProduct, Self::on_decrement_product);
        handlers.insert(ActionKind::PrintBill, Self::on_print_bill);
        handlers.insert(ActionKind::DismissAlert, Self::on_dismiss_alert);
        handlers.insert(ActionKind::CustomerNameChanged, Self::on_customer_name_changed);

        let mut presenter = Self {
            model,
            bill_updates,
            view,
            alerts,
            printer,
            transport,
            formatter: BillFormatter::new(config.billing.clone()),
            validator: BillSubmissionValidator::new(config.billing.clone()),
            config,
            customer_name: String::new(),
            filtered: BTreeSet::new(),
            pending: None,
            handlers,
        };
        presenter.refresh_print_trigger();
        presenter
    }

    pub fn model(&self) -> &OrderModel {
        &self.model
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Id of the submission awaiting its reply, if any.
    pub fn pending_submission(&self) -> Option<SubmissionId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub fn is_print_enabled(&self) -> bool {
        self.pending.is_none() && self.config.accepts_customer_name(&self.customer_name)
    }

    pub fn is_category_filtered(&self, category: CategoryId) -> bool {
        self.filtered.contains(&category)
    }

    /// Route one UI event to its handler, then redraw anything the model changed.
    pub fn handle(&mut self, event: impl Into<UiEvent>) -> Result<(), PresenterError> {
        let UiEvent { action } = event.into();
        let kind = action.kind();
        let result = match self.handlers.get(&kind).copied() {
            Some(handler) => handler(self, action),
            None => {
                tracing::debug!(?kind, "no handler registered for UI action");
                Ok(())
            }
        };

        self.sync();

        if let Err(err) = &result {
            tracing::warn!(?kind, error = %err, "UI action failed");
        }
        result
    }

    /// Re-render from the newest bill notification, if there is one.
    ///
    /// Returns whether the view was redrawn.
    pub fn sync(&mut self) -> bool {
        let Some(change) = self.bill_updates.latest() else {
            return false;
        };
        let rows = self.formatter.render_bill(&change.bill, self.model.categories());
        self.view.render_bill(&rows);
        true
    }

    /// Deliver the single reply of an outstanding submission.
    ///
    /// `reply` is `Ok(None)` when the server answered with nothing usable.
    pub fn complete_submission(
        &mut self,
        id: SubmissionId,
        reply: Result<Option<SubmissionResponse>, TransportError>,
    ) -> Result<SubmissionOutcome, PresenterError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                self.pending = other;
                tracing::warn!(submission_id = %id, "ignoring reply for unknown submission");
                return Err(PresenterError::UnexpectedReply(id));
            }
        };
        self.refresh_print_trigger();

        let response = match reply {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(submission_id = %id, status = err.status, "bill submission failed");
                self.alerts.show_alert(&alert::transport_failure());
                return Ok(SubmissionOutcome::TransportFailed(err));
            }
        };

        let confirmed = match self.validator.validate(response.as_ref(), pending.bill.total) {
            Ok(confirmed) => confirmed,
            Err(rejection) => {
                tracing::warn!(
                    submission_id = %id,
                    kind = ?rejection.kind(),
                    detail = rejection.detail(),
                    "bill rejected"
                );
                self.alerts.show_alert(&alert::rejection(&rejection));
                return Ok(SubmissionOutcome::Rejected(rejection));
            }
        };

        tracing::info!(
            submission_id = %id,
            bill_id = %confirmed.bill_id,
            total = %confirmed.total,
            "bill accepted"
        );

        if let Err(err) = self.printer.print(&pending.bill, &confirmed) {
            tracing::error!(submission_id = %id, error = %err, "bill printing failed");
            self.alerts.show_alert(&alert::print_failure(&confirmed.bill_id, &err));
            return Err(err.into());
        }

        self.model.clear()?;
        self.sync();

        Ok(SubmissionOutcome::Printed(confirmed))
    }

    fn refresh_print_trigger(&mut self) {
        let enabled = self.is_print_enabled();
        self.view.set_print_enabled(enabled);
    }

    fn on_select_category(&mut self, action: UiAction) -> Result<(), PresenterError> {
        if let UiAction::SelectCategory(category) = action {
            let filtered = if self.filtered.remove(&category) {
                false
            } else {
                self.filtered.insert(category);
                true
            };
            self.view.set_category_filtered(category, filtered);
        }
        Ok(())
    }

    fn on_order_product(&mut self, action: UiAction) -> Result<(), PresenterError> {
        if let UiAction::OrderProduct(button) = action {
            self.model.add_product(button.to_line_item())?;
        }
        Ok(())
    }

    fn on_increment_product(&mut self, action: UiAction) -> Result<(), PresenterError> {
        if let UiAction::IncrementProduct(product_id) = action {
            self.model.increment_product(product_id, 1)?;
        }
        Ok(())
    }

    fn on_decrement_product(&mut self, action: UiAction) -> Result<(), PresenterError> {
        if let UiAction::DecrementProduct(product_id) = action {
            self.model.decrement_product(product_id, 1)?;
        }
        Ok(())
    }

    fn on_dismiss_alert(&mut self, _action: UiAction) -> Result<(), PresenterError> {
        self.alerts.hide_alert();
        Ok(())
    }

    fn on_customer_name_changed(&mut self, action: UiAction) -> Result<(), PresenterError> {
        if let UiAction::CustomerNameChanged(name) = action {
            self.customer_name = name;
            self.refresh_print_trigger();
        }
        Ok(())
    }

    fn on_print_bill(&mut self, _action: UiAction) -> Result<(), PresenterError> {
        if let Some(pending) = &self.pending {
            return Err(DomainError::conflict(format!(
                "submission {} is still awaiting its reply",
                pending.id
            ))
            .into());
        }
        if !self.is_print_enabled() || self.model.is_empty() {
            tracing::debug!("print requested with disabled trigger or empty bill");
            return Ok(());
        }

        let submission = self.model.submission(&self.customer_name);
        let pending = PendingSubmission {
            id: submission.submission_id,
            bill: self.model.bill(),
        };

        match self.transport.send(&submission) {
            Ok(()) => {
                tracing::info!(
                    submission_id = %submission.submission_id,
                    items = submission.items.len(),
                    total = %submission.total,
                    "bill submitted"
                );
                self.pending = Some(pending);
                self.refresh_print_trigger();
            }
            Err(err) => {
                tracing::warn!(
                    submission_id = %submission.submission_id,
                    status = err.status,
                    "bill submission could not be sent"
                );
                self.alerts.show_alert(&alert::transport_failure());
            }
        }
        Ok(())
    }
}
