//! User-facing alert texts.

use webpos_billing::SubmissionRejection;
use webpos_billing::submission::RETRY_HINT;

use crate::error::PrintError;

/// The request could not be delivered or the link dropped.
pub fn transport_failure() -> String {
    format!("<p>Errore di comunicazione col server</p>{RETRY_HINT}")
}

/// The server stored the bill but the printer did not produce it.
pub fn print_failure(bill_id: &str, err: &PrintError) -> String {
    format!("<p>Errore di stampa</p>Conto {bill_id} registrato ma non stampato: {}", err.0)
}

/// Text shown for a rejected submission.
pub fn rejection(rejection: &SubmissionRejection) -> String {
    match rejection {
        SubmissionRejection::CommunicationFailure { detail } => {
            format!("<p>Il server non ha risposto correttamente</p>{detail}")
        }
        SubmissionRejection::StockShortage { detail, .. } => {
            format!("<p>Disponibilità non sufficienti</p>È rimasto {detail}")
        }
        SubmissionRejection::TotalMismatch { detail, .. } => {
            format!("<p>Totale variato</p>Il totale aggiornato è di {detail}")
        }
    }
}
