//! Form rendering and submitted-value parsing for post/redirect/get screens.
//!
//! A failed submission re-renders the same [`Form`] from the submitted
//! [`FormData`], so users never retype what they entered; field messages
//! appear next to the matching input.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::escape;
use crate::domain::models::parse_form_datetime;
use crate::domain::Amount;

const REQUIRED_MESSAGE: &str = "Ce champ est obligatoire.";

/// Submitted `application/x-www-form-urlencoded` values, keyed by name.
///
/// Every input uses a distinct name; multi-selects use one checkbox per
/// option named `<prefix>-<id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for FormData {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            errors: BTreeMap::new(),
        }
    }
}

impl FormData {
    /// Start from initial values (edit forms).
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// Raw value as submitted.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// Trimmed value, `None` when blank.
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        let value = self.value(name).trim();
        (!value.is_empty()).then(|| value.to_owned())
    }

    /// Trimmed value; records an error when blank.
    pub fn required(&mut self, name: &str) -> String {
        self.optional(name).unwrap_or_else(|| {
            self.reject(name, REQUIRED_MESSAGE);
            String::new()
        })
    }

    /// Parsed optional value; records `message` when present but invalid.
    pub fn parsed<T: FromStr>(&mut self, name: &str, message: &str) -> Option<T> {
        let raw = self.optional(name)?;
        let parsed = raw.parse().ok();
        if parsed.is_none() {
            self.reject(name, message);
        }
        parsed
    }

    /// Optional timestamp typed in a `datetime-local` input.
    pub fn datetime(&mut self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.optional(name)?;
        let parsed = parse_form_datetime(&raw);
        if parsed.is_none() {
            self.reject(name, "Date invalide.");
        }
        parsed
    }

    /// Mandatory timestamp.
    pub fn required_datetime(&mut self, name: &str) -> Option<DateTime<Utc>> {
        if self.optional(name).is_none() {
            self.reject(name, REQUIRED_MESSAGE);
            return None;
        }
        self.datetime(name)
    }

    /// Optional strictly positive amount.
    pub fn amount(&mut self, name: &str) -> Option<Amount> {
        let raw = self.optional(name)?;
        match Amount::parse_positive(&raw) {
            Ok(amount) => Some(amount),
            Err(error) => {
                self.reject(name, &error.to_string());
                None
            }
        }
    }

    /// Mandatory strictly positive amount.
    pub fn required_amount(&mut self, name: &str) -> Option<Amount> {
        if self.optional(name).is_none() {
            self.reject(name, REQUIRED_MESSAGE);
            return None;
        }
        self.amount(name)
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.value(name), "on" | "true" | "1")
    }

    /// Identifiers of ticked `<prefix>-<id>` checkboxes.
    #[must_use]
    pub fn checked_ids(&self, prefix: &str) -> Vec<String> {
        let marker = format!("{prefix}-");
        self.values
            .keys()
            .filter_map(|key| key.strip_prefix(&marker))
            .filter(|id| self.checked(&format!("{marker}{id}")))
            .map(str::to_owned)
            .collect()
    }

    /// Set or replace a value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_owned(), value.into());
    }

    /// Record a field error; the first message per field wins.
    pub fn reject(&mut self, name: &str, message: &str) {
        self.errors
            .entry(name.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    /// Merge backend field errors.
    pub fn merge_errors(&mut self, fields: &BTreeMap<String, String>) {
        for (name, message) in fields {
            self.reject(name, message);
        }
    }

    /// Field errors recorded so far.
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Whether every parse succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Method of a rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
}

/// HTML form builder.
///
/// # Examples
/// ```
/// use portal::inbound::http::html::{Form, FormData};
///
/// let mut data = FormData::from_pairs([("title", "Collecte <hiver>")]);
/// data.reject("title", "Trop long.");
/// let html = Form::post("/admin/projects", &data)
///     .text("title", "Titre", true)
///     .submit("Enregistrer")
///     .render();
/// assert!(html.contains("value=\"Collecte &lt;hiver&gt;\""));
/// assert!(html.contains("Trop long."));
/// ```
pub struct Form<'a> {
    method: Method,
    action: &'a str,
    data: &'a FormData,
    fields: String,
    submit: &'a str,
}

impl<'a> Form<'a> {
    /// `POST` form populated from `data`.
    #[must_use]
    pub fn post(action: &'a str, data: &'a FormData) -> Self {
        Self::new(Method::Post, action, data)
    }

    /// `GET` filter form; it never carries a page parameter, so submitting
    /// it always requests page 1.
    #[must_use]
    pub fn filter(action: &'a str, data: &'a FormData) -> Self {
        Self::new(Method::Get, action, data).submit("Filtrer")
    }

    fn new(method: Method, action: &'a str, data: &'a FormData) -> Self {
        Self {
            method,
            action,
            data,
            fields: String::new(),
            submit: "Envoyer",
        }
    }

    fn wrap(&mut self, name: &str, label: &str, input: &str) {
        let error = self.data.errors().get(name).map_or_else(String::new, |message| {
            format!(
                "<span class=\"field-error\" id=\"{}-error\">{}</span>",
                escape(name),
                escape(message)
            )
        });
        let invalid = if error.is_empty() { "" } else { " invalid" };
        self.fields.push_str(&format!(
            "<div class=\"field{invalid}\"><label for=\"{}\">{}</label>{input}{error}</div>",
            escape(name),
            escape(label)
        ));
    }

    fn input(mut self, kind: &str, name: &str, label: &str, required: bool, extra: &str) -> Self {
        let value = if kind == "password" {
            String::new()
        } else {
            format!(" value=\"{}\"", escape(self.data.value(name)))
        };
        let input = format!(
            "<input type=\"{kind}\" id=\"{name}\" name=\"{name}\"{value}{}{extra}>",
            required_attr(required),
            name = escape(name),
        );
        self.wrap(name, label, &input);
        self
    }

    /// Single-line text input.
    #[must_use]
    pub fn text(self, name: &str, label: &str, required: bool) -> Self {
        self.input("text", name, label, required, "")
    }

    /// Email input.
    #[must_use]
    pub fn email(self, name: &str, label: &str, required: bool) -> Self {
        self.input("email", name, label, required, " autocomplete=\"email\"")
    }

    /// Password input; never repopulated.
    #[must_use]
    pub fn password(self, name: &str, label: &str) -> Self {
        self.input("password", name, label, true, "")
    }

    /// Numeric input with a `step`.
    #[must_use]
    pub fn number(self, name: &str, label: &str, step: &str, required: bool) -> Self {
        let extra = format!(" step=\"{}\" min=\"0\" inputmode=\"decimal\"", escape(step));
        self.input("number", name, label, required, &extra)
    }

    /// `datetime-local` input.
    #[must_use]
    pub fn datetime(self, name: &str, label: &str, required: bool) -> Self {
        self.input("datetime-local", name, label, required, "")
    }

    /// Multi-line text area.
    #[must_use]
    pub fn textarea(mut self, name: &str, label: &str, required: bool) -> Self {
        let input = format!(
            "<textarea id=\"{name}\" name=\"{name}\" rows=\"8\"{}>{}</textarea>",
            required_attr(required),
            escape(self.data.value(name)),
            name = escape(name),
        );
        self.wrap(name, label, &input);
        self
    }

    /// Drop-down; a blank "Tous" option is added unless `required`.
    #[must_use]
    pub fn select(self, name: &str, label: &str, options: &[(&str, &str)], required: bool) -> Self {
        let blank = (!required).then_some("Tous");
        self.choice(name, label, options, blank)
    }

    /// Optional drop-down whose blank option reads `blank`.
    #[must_use]
    pub fn optional_select(self, name: &str, label: &str, options: &[(&str, &str)], blank: &str) -> Self {
        self.choice(name, label, options, Some(blank))
    }

    fn choice(mut self, name: &str, label: &str, options: &[(&str, &str)], blank: Option<&str>) -> Self {
        let current = self.data.value(name);
        let mut input = format!(
            "<select id=\"{name}\" name=\"{name}\"{}>",
            required_attr(blank.is_none()),
            name = escape(name)
        );
        if let Some(blank) = blank {
            input.push_str(&format!("<option value=\"\">{}</option>", escape(blank)));
        }
        for (value, text) in options {
            let selected = if *value == current { " selected" } else { "" };
            input.push_str(&format!(
                "<option value=\"{}\"{selected}>{}</option>",
                escape(value),
                escape(text)
            ));
        }
        input.push_str("</select>");
        self.wrap(name, label, &input);
        self
    }

    /// Single checkbox.
    #[must_use]
    pub fn checkbox(mut self, name: &str, label: &str) -> Self {
        let checked = if self.data.checked(name) { " checked" } else { "" };
        self.fields.push_str(&format!(
            "<div class=\"field checkbox\"><label><input type=\"checkbox\" name=\"{}\" value=\"on\"{checked}> {}</label></div>",
            escape(name),
            escape(label)
        ));
        self
    }

    /// One checkbox per option, named `<prefix>-<id>`.
    #[must_use]
    pub fn checkboxes(mut self, prefix: &str, legend: &str, options: &[(&str, &str)]) -> Self {
        let mut html = format!("<fieldset><legend>{}</legend>", escape(legend));
        for (id, text) in options {
            let name = format!("{prefix}-{id}");
            let checked = if self.data.checked(&name) { " checked" } else { "" };
            html.push_str(&format!(
                "<label><input type=\"checkbox\" name=\"{}\" value=\"on\"{checked}> {}</label>",
                escape(&name),
                escape(text)
            ));
        }
        html.push_str("</fieldset>");
        self.fields.push_str(&html);
        self
    }

    /// Hidden input.
    #[must_use]
    pub fn hidden(mut self, name: &str, value: &str) -> Self {
        self.fields.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            escape(name),
            escape(value)
        ));
        self
    }

    /// Submit button label.
    #[must_use]
    pub const fn submit(mut self, label: &'a str) -> Self {
        self.submit = label;
        self
    }

    /// Render the form.
    #[must_use]
    pub fn render(&self) -> String {
        let method = match self.method {
            Method::Get => "get",
            Method::Post => "post",
        };
        format!(
            "<form method=\"{method}\" action=\"{}\" class=\"form-{method}\">{}<button type=\"submit\">{}</button></form>",
            escape(self.action),
            self.fields,
            escape(self.submit)
        )
    }
}

const fn required_attr(required: bool) -> &'static str {
    if required { " required" } else { "" }
}

/// Single-button `POST` form, for actions such as delete or register.
#[must_use]
pub fn button_form(action: &str, label: &str, confirm: Option<&str>) -> String {
    let onsubmit = confirm.map_or_else(String::new, |message| {
        format!(
            " onsubmit=\"return confirm('{}')\"",
            escape(&message.replace('\'', "\\'"))
        )
    });
    format!(
        "<form method=\"post\" action=\"{}\" class=\"inline\"{onsubmit}><button type=\"submit\">{}</button></form>",
        escape(action),
        escape(label)
    )
}
