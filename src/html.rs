//! Static HTML rendering of a token table
//!
//! Produces a self-contained page: a selection summary line plus the top
//! and bottom token tables with cells colored by activation magnitude. The
//! core stays a plain data pipeline; this module is one rendering layer
//! over it.

use crate::color::cell_color;
use crate::view::{format_token, TokenTable};
use crate::widget::TopkTokens;

/// Render the viewer's current table as a standalone HTML page.
pub fn render_page(viewer: &TopkTokens, table: &TokenTable) -> String {
    let selection = viewer.selection();
    let labels = viewer.labels();

    let mut page = String::new();
    page.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Top-k activating tokens</title>\n<style>\n\
         body { font-family: sans-serif; margin: 1.5em; }\n\
         table { border-collapse: collapse; margin-bottom: 1.5em; }\n\
         th, td { border: 1px solid #ccc; padding: 2px 8px; text-align: center; }\n\
         td.token { font-family: monospace; white-space: pre; }\n\
         </style>\n</head>\n<body>\n",
    );

    page.push_str(&format!(
        "<p>{}: {} &middot; {}: {} &middot; {}s {}&ndash;{} &middot; k = {}</p>\n",
        escape(labels.sample()),
        selection.sample,
        escape(labels.layer()),
        selection.layer,
        escape(labels.neuron()),
        selection.neuron_lo,
        selection.neuron_hi,
        selection.k,
    ));

    render_table(&mut page, "Top tokens", labels.neuron(), table, true);
    render_table(&mut page, "Bottom tokens", labels.neuron(), table, false);

    page.push_str("</body>\n</html>\n");
    page
}

fn render_table(
    page: &mut String,
    title: &str,
    neuron_label: &str,
    table: &TokenTable,
    top: bool,
) {
    let (tokens, values) = if top {
        (&table.top_tokens, &table.top_values)
    } else {
        (&table.bottom_tokens, &table.bottom_values)
    };

    page.push_str(&format!("<h3>{}</h3>\n<table>\n<tr><th></th>", escape(title)));
    for neuron in &table.neuron_indices {
        page.push_str(&format!("<th>{} {neuron}</th>", escape(neuron_label)));
    }
    page.push_str("</tr>\n");

    for (rank, (token_row, value_row)) in tokens.iter().zip(values.iter()).enumerate() {
        page.push_str(&format!("<tr><th>{}</th>", rank + 1));
        for (token, value) in token_row.iter().zip(value_row.iter()) {
            page.push_str(&format!(
                "<td class=\"token\" style=\"background-color: {}\" title=\"{value:+.4}\">{}</td>",
                cell_color(*value, table.max_abs),
                escape(&format_token(token)),
            ));
        }
        page.push_str("</tr>\n");
    }
    page.push_str("</table>\n");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
