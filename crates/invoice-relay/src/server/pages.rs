//! HTML pages served by the relay.

use crate::models::Invoice;

/// Render the invoice collection as an HTML table.
///
/// All cell values are HTML-escaped. An empty collection renders a
/// placeholder instead of an empty table.
#[must_use]
pub fn render_invoices_page(invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return page("Invoices", "<p>No invoices found.</p>");
    }

    let mut rows = String::new();
    for invoice in invoices {
        let total = invoice.total_amt.map(|amt| format!("{amt:.2}")).unwrap_or_default();
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(invoice.doc_number_or_default()),
            html_escape(invoice.txn_date.as_deref().unwrap_or_default()),
            html_escape(invoice.customer_name().unwrap_or_default()),
            html_escape(&total),
            html_escape(invoice.print_status.as_deref().unwrap_or_default()),
        ));
    }

    let table = format!(
        r#"<h1>Invoices</h1>
<table>
<thead>
<tr><th>Doc Number</th><th>Transaction Date</th><th>Customer</th><th>Total Amount</th><th>Status</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>"#
    );

    page("Invoices", &table)
}

/// Render the landing page with a link into the authorization flow.
#[must_use]
pub fn render_landing_page() -> String {
    page(
        "Invoice Relay",
        r#"<h1>Invoice Relay</h1>
<p>Connect your accounting company to browse its invoices.</p>
<p><a class="connect" href="/auth">Connect to QuickBooks</a></p>"#,
    )
}

/// Wrap page content in the shared document shell.
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; margin: 0; padding: 40px; }}
h1 {{ font-size: 20px; color: #333; }}
table {{ border-collapse: collapse; background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }}
th, td {{ padding: 10px 16px; text-align: left; font-size: 14px; color: #333; }}
th {{ border-bottom: 2px solid #ddd; }}
tr:nth-child(even) {{ background: #fafafa; }}
a.connect {{ display: inline-block; padding: 10px 16px; background: #4a90d9; color: #fff; border-radius: 4px; text-decoration: none; font-size: 14px; }}
a.connect:hover {{ background: #357abd; }}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice(doc: &str, customer: &str) -> Invoice {
        serde_json::from_value(json!({
            "DocNumber": doc,
            "TxnDate": "2024-03-15",
            "CustomerRef": {"value": "1", "name": customer},
            "TotalAmt": 100.5,
            "PrintStatus": "NeedToPrint"
        }))
        .unwrap()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("xss")</script>"#),
            "&lt;script&gt;alert(&quot;xss&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_empty_collection_renders_placeholder() {
        let html = render_invoices_page(&[]);
        assert!(html.contains("No invoices found."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_rows_rendered_with_all_columns() {
        let html = render_invoices_page(&[invoice("1001", "Amy's Bird Sanctuary")]);
        assert!(html.contains("<td>1001</td>"));
        assert!(html.contains("<td>2024-03-15</td>"));
        assert!(html.contains("Amy&#x27;s Bird Sanctuary"));
        assert!(html.contains("<td>100.50</td>"));
        assert!(html.contains("<td>NeedToPrint</td>"));
    }

    #[test]
    fn test_cell_values_escaped() {
        let html = render_invoices_page(&[invoice("<b>1</b>", "Evil & Co")]);
        assert!(!html.contains("<b>1</b>"));
        assert!(html.contains("&lt;b&gt;1&lt;/b&gt;"));
        assert!(html.contains("Evil &amp; Co"));
    }

    #[test]
    fn test_landing_links_to_auth() {
        let html = render_landing_page();
        assert!(html.contains(r#"href="/auth""#));
    }
}
