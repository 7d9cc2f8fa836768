//! Server-side HTML building blocks.
//!
//! Pages are assembled from escaped strings. Every value that comes from the
//! backend or the browser goes through [`escape`] before it is interpolated;
//! builders in the submodules escape their own inputs.

pub mod form;
pub mod pagination;
pub mod table;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, ContentType};

use super::cache_control::PRIVATE_NO_CACHE_MUST_REVALIDATE;
use super::report::Banner;
use crate::domain::{TraceId, escape_html};

pub use form::{Form, FormData, button_form};
pub use self::pagination::pagination;
pub use table::Table;

/// Site name shown in titles and the header.
pub const SITE_NAME: &str = "Nouveau Souffle";

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape(raw: &str) -> String {
    escape_html(raw)
}

/// Navigation variant of the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    /// Public site; `signed_in` switches the account link.
    Public {
        /// Whether a session cookie is present.
        signed_in: bool,
    },
    /// Member area.
    Member {
        /// Greeting name.
        name: String,
        /// Whether the back-office link is shown.
        admin: bool,
    },
    /// Admin back-office.
    Admin,
}

impl Nav {
    fn links(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Public { .. } => &[
                ("/", "Accueil"),
                ("/articles", "Actualités"),
                ("/projects", "Projets"),
                ("/events", "Événements"),
                ("/trainings", "Formations"),
                ("/about", "L'association"),
                ("/contact", "Contact"),
            ],
            Self::Member { .. } => &[
                ("/dashboard", "Tableau de bord"),
                ("/dashboard/donations", "Mes dons"),
                ("/dashboard/membership", "Mon adhésion"),
                ("/dashboard/events", "Mes événements"),
                ("/dashboard/trainings", "Mes formations"),
            ],
            Self::Admin => &[
                ("/admin", "Vue d'ensemble"),
                ("/admin/articles", "Articles"),
                ("/admin/projects", "Projets"),
                ("/admin/events", "Événements"),
                ("/admin/trainings", "Formations"),
                ("/admin/donations", "Dons"),
                ("/admin/memberships", "Adhésions"),
                ("/admin/users", "Utilisateurs"),
                ("/admin/maraude/sessions", "Maraudes"),
                ("/admin/maraude/beneficiaries", "Bénéficiaires"),
                ("/admin/maraude/zones", "Zones"),
                ("/admin/maraude/categories", "Besoins"),
            ],
        }
    }

    fn account(&self) -> String {
        match self {
            Self::Public { signed_in: false } => {
                "<a href=\"/auth/login\">Se connecter</a> <a href=\"/auth/register\">Adhérer</a>"
                    .to_owned()
            }
            Self::Public { signed_in: true } => {
                "<a href=\"/dashboard\">Mon espace</a> ".to_owned() + LOGOUT_FORM
            }
            Self::Member { name, admin } => {
                let mut html = format!("<span class=\"greeting\">Bonjour {}</span> ", escape(name));
                if *admin {
                    html.push_str("<a href=\"/admin\">Administration</a> ");
                }
                html.push_str("<a href=\"/\">Site public</a> ");
                html.push_str(LOGOUT_FORM);
                html
            }
            Self::Admin => "<a href=\"/dashboard\">Mon espace</a> ".to_owned() + LOGOUT_FORM,
        }
    }

    const fn is_private(&self) -> bool {
        !matches!(self, Self::Public { .. })
    }
}

const LOGOUT_FORM: &str = "<form method=\"post\" action=\"/auth/logout\" class=\"inline\">\
<button type=\"submit\">Se déconnecter</button></form>";

/// A full HTML document.
///
/// # Examples
/// ```
/// use portal::inbound::http::html::{Nav, Page};
///
/// let html = Page::new("Contact")
///     .nav(Nav::Public { signed_in: false })
///     .body("<p>Écrivez-nous.</p>")
///     .render();
/// assert!(html.contains("<title>Contact · Nouveau Souffle</title>"));
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    nav: Nav,
    banners: Vec<Banner>,
    head: String,
    body: String,
    status: StatusCode,
}

impl Page {
    /// Empty page with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nav: Nav::Public { signed_in: false },
            banners: Vec::new(),
            head: String::new(),
            body: String::new(),
            status: StatusCode::OK,
        }
    }

    /// Header navigation.
    #[must_use]
    pub fn nav(mut self, nav: Nav) -> Self {
        self.nav = nav;
        self
    }

    /// Add a banner above the content.
    #[must_use]
    pub fn banner(mut self, banner: Banner) -> Self {
        self.banners.push(banner);
        self
    }

    /// Add a banner when present.
    #[must_use]
    pub fn banner_opt(self, banner: Option<Banner>) -> Self {
        match banner {
            Some(banner) => self.banner(banner),
            None => self,
        }
    }

    /// Extra `<head>` markup (trusted).
    #[must_use]
    pub fn head(mut self, markup: impl AsRef<str>) -> Self {
        self.head.push_str(markup.as_ref());
        self
    }

    /// Main content markup (trusted).
    #[must_use]
    pub fn body(mut self, markup: impl AsRef<str>) -> Self {
        self.body.push_str(markup.as_ref());
        self
    }

    /// Response status.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Render the document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(self.body.len() + 2048);
        html.push_str(&format!("<!doctype html><html lang=\"fr\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{} · {SITE_NAME}</title><link rel=\"stylesheet\" href=\"/static/portal.css\">{}</head><body>",
            escape(&self.title),
            self.head
        ));
        html.push_str("<header><a class=\"brand\" href=\"/\">");
        html.push_str(SITE_NAME);
        html.push_str("</a><nav>");
        for (href, label) in self.nav.links() {
            html.push_str(&format!("<a href=\"{href}\">{label}</a>"));
        }
        html.push_str(&format!("</nav><div class=\"account\">{}</div></header>", self.nav.account()));
        html.push_str("<main>");
        html.push_str(&format!("<h1>{}</h1>", escape(&self.title)));
        for banner in &self.banners {
            html.push_str(&render_banner(banner));
        }
        html.push_str(&self.body);
        html.push_str("</main><footer><p>Nouveau Souffle · association loi 1901</p>");
        if let Some(trace_id) = TraceId::current() {
            html.push_str(&format!("<p class=\"trace\">Référence : {trace_id}</p>"));
        }
        html.push_str("</footer></body></html>");
        html
    }

    /// Render into an HTML response; member and admin pages are never cached
    /// by shared caches.
    #[must_use]
    pub fn respond(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        builder.content_type(ContentType::html());
        if self.nav.is_private() {
            builder.insert_header((CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE));
        }
        builder.body(self.render())
    }
}

/// Banner markup; error banners are announced to assistive technology.
#[must_use]
pub fn render_banner(banner: &Banner) -> String {
    let role = if banner.tone == super::report::Tone::Error {
        " role=\"alert\""
    } else {
        ""
    };
    format!(
        "<div class=\"banner banner-{}\"{role}>{}</div>",
        banner.tone.as_str(),
        escape(&banner.message)
    )
}

/// Definition list of label/value pairs; values are escaped.
#[must_use]
pub fn details(rows: &[(&str, String)]) -> String {
    let mut html = String::from("<dl class=\"details\">");
    for (label, value) in rows {
        html.push_str(&format!("<dt>{}</dt><dd>{}</dd>", escape(label), escape(value)));
    }
    html.push_str("</dl>");
    html
}

/// Link with escaped text and target.
#[must_use]
pub fn link(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

/// `303 See Other` to `location`.
#[must_use]
pub fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, location.as_ref()))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn titles_and_banners_are_escaped() {
        let html = Page::new("<script>")
            .banner(Banner::error("a & b"))
            .render();
        assert!(html.contains("<h1>&lt;script&gt;</h1>"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("role=\"alert\""));
    }

    #[rstest]
    fn admin_nav_lists_maraude_screens() {
        let html = Page::new("Back-office").nav(Nav::Admin).render();
        assert!(html.contains("/admin/maraude/sessions"));
        assert!(!html.contains("/auth/login"));
    }

    #[rstest]
    fn private_pages_are_not_cached() {
        let res = Page::new("Mes dons")
            .nav(Nav::Member {
                name: "Ada".to_owned(),
                admin: false,
            })
            .respond();
        assert_eq!(
            res.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some(PRIVATE_NO_CACHE_MUST_REVALIDATE)
        );
    }
}
