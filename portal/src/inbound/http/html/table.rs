//! Data tables with an explicit empty state.

use super::escape;

type Cell<'a, T> = Box<dyn Fn(&T) -> String + 'a>;

/// Column-oriented table builder.
///
/// Text cells are escaped; [`Table::html_column`] cells are trusted markup
/// built by the caller from escaped parts.
///
/// # Examples
/// ```
/// use portal::inbound::http::html::Table;
///
/// let rows = ["Soupe <chaude>"];
/// let html = Table::new("Aucune maraude.")
///     .column("Titre", |row: &&str| (*row).to_owned())
///     .render(&rows);
/// assert!(html.contains("Soupe &lt;chaude&gt;"));
/// ```
pub struct Table<'a, T> {
    empty_message: &'a str,
    columns: Vec<(&'a str, Cell<'a, T>)>,
}

impl<'a, T> Table<'a, T> {
    /// Table showing `empty_message` when there are no rows.
    #[must_use]
    pub fn new(empty_message: &'a str) -> Self {
        Self {
            empty_message,
            columns: Vec::new(),
        }
    }

    /// Escaped text column.
    #[must_use]
    pub fn column(mut self, header: &'a str, cell: impl Fn(&T) -> String + 'a) -> Self {
        self.columns
            .push((header, Box::new(move |row| escape(&cell(row)))));
        self
    }

    /// Markup column.
    #[must_use]
    pub fn html_column(mut self, header: &'a str, cell: impl Fn(&T) -> String + 'a) -> Self {
        self.columns.push((header, Box::new(cell)));
        self
    }

    /// Render `rows`, or the empty state.
    #[must_use]
    pub fn render(&self, rows: &[T]) -> String {
        if rows.is_empty() {
            return format!("<p class=\"empty\">{}</p>", escape(self.empty_message));
        }
        let mut html = String::from("<table><thead><tr>");
        for (header, _) in &self.columns {
            html.push_str(&format!("<th scope=\"col\">{}</th>", escape(header)));
        }
        html.push_str("</tr></thead><tbody>");
        for row in rows {
            html.push_str("<tr>");
            for (_, cell) in &self.columns {
                html.push_str("<td>");
                html.push_str(&cell(row));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}
