//! Invoice data model matching the QuickBooks query API schema.

use serde::{Deserialize, Serialize};

/// An invoice record from the accounting API.
///
/// Only the fields the relay reads are typed; everything else the provider
/// sends rides along in `extra` and round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    /// Document number (the lookup key for single-invoice queries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<String>,

    /// Transaction date in ISO format (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_date: Option<String>,

    /// Reference to the invoiced customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<CustomerRef>,

    /// Total amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amt: Option<f64>,

    /// Print status (e.g. "NeedToPrint", "NotSet").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_status: Option<String>,

    /// All remaining provider fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reference to a customer entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    /// Customer entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Invoice {
    /// Document number, or an empty string if the provider omitted it.
    #[must_use]
    pub fn doc_number_or_default(&self) -> &str {
        self.doc_number.as_deref().unwrap_or_default()
    }

    /// Customer display name if available.
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_ref.as_ref()?.name.as_deref()
    }

    /// Check whether this invoice's document number equals `doc_number`.
    ///
    /// Exact, case-sensitive comparison; an invoice without a document
    /// number never matches.
    #[must_use]
    pub fn matches_doc_number(&self, doc_number: &str) -> bool {
        self.doc_number.as_deref() == Some(doc_number)
    }
}

/// Response envelope of the provider query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryEnvelope {
    /// Query result wrapper.
    #[serde(rename = "QueryResponse", default)]
    pub query_response: QueryResponse,
}

/// Inner query result. The provider omits the `Invoice` key entirely when
/// the query matches nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// The matched invoices.
    #[serde(rename = "Invoice", default)]
    pub invoices: Vec<Invoice>,
}
