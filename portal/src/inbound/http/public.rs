//! Public site pages.
//!
//! ```text
//! GET /                 Home: latest articles and active projects
//! GET /about            Association presentation
//! GET /contact          Contact details
//! GET /articles         Published articles, filterable by category
//! GET /articles/{slug}  Article with rendered content
//! GET /projects         Projects open to donations
//! GET /projects/{id}    Project with funding progress
//! GET /events           Published events
//! GET /events/{id}      Event with capacity and registration
//! GET /trainings        Published trainings
//! ```

use actix_web::{HttpResponse, get, web};
use pagination::PageRequest;
use serde::Deserialize;

use super::ApiResult;
use super::html::{Nav, Page, Table, button_form, details, escape, link};
use super::listing::{ListParams, load_list};
use super::report::{ReportPolicy, report};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::models::{
    Article, ArticleFilters, Event, EventFilters, Project, ProjectFilters, Training,
    TrainingFilters, format_date, format_datetime,
};
use crate::domain::{Credentials, ListQuery, render_markup};

const HOME_TEASERS: u32 = 3;

fn public_page(title: &str, session: &SessionContext) -> Page {
    Page::new(title)
        .nav(Nav::Public {
            signed_in: session.has_token(),
        })
        .banner_opt(session.take_flash())
}

fn article_card(article: &Article) -> String {
    let date = article
        .published_at
        .as_ref()
        .map_or_else(String::new, |at| format!("<time>{}</time>", format_date(at)));
    format!(
        "<article class=\"card\"><h2>{}</h2>{date}<p>{}</p></article>",
        link(&format!("/articles/{}", article.slug), &article.title),
        escape(&article.summary())
    )
}

fn progress_bar(project: &Project) -> String {
    let collected = format!("{} collectés", project.collected_amount);
    match (project.progress_percent(), project.target_amount.as_ref()) {
        (Some(percent), Some(target)) => format!(
            "<div class=\"progress\"><progress max=\"100\" value=\"{percent}\">{percent} %</progress>\
<span>{} sur {} ({percent} %)</span></div>",
            escape(&collected),
            escape(&target.to_string())
        ),
        _ => format!("<div class=\"progress\"><span>{}</span></div>", escape(&collected)),
    }
}

fn project_card(project: &Project) -> String {
    format!(
        "<article class=\"card\"><h2>{}</h2>{}</article>",
        link(&format!("/projects/{}", project.id), &project.title),
        progress_bar(project)
    )
}

fn places(capacity: Option<u32>, remaining: Option<u32>) -> String {
    match (capacity, remaining) {
        (Some(capacity), Some(0)) => format!("Complet ({capacity} places)"),
        (Some(capacity), Some(remaining)) => format!("{remaining} places restantes sur {capacity}"),
        _ => "Entrée libre".to_owned(),
    }
}

/// Home page.
#[get("/")]
pub async fn home(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let teaser = PageRequest::first(HOME_TEASERS);
    let articles = report(
        state
            .articles
            .list(
                &Credentials::Anonymous,
                &ListQuery::new(teaser, ArticleFilters::published(None)),
            )
            .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .map(|page| page.data)
    .unwrap_or_default();
    let projects = report(
        state
            .projects
            .list(&Credentials::Anonymous, &ListQuery::new(teaser, ProjectFilters::active()))
            .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .map(|page| page.data)
    .unwrap_or_default();

    let mut body = String::from(
        "<section class=\"hero\"><p>Nouveau Souffle accompagne les personnes en situation de \
rue : maraudes, formations et projets solidaires.</p>\
<p><a class=\"button\" href=\"/dashboard/donations/new\">Faire un don</a> \
<a class=\"button\" href=\"/auth/register\">Devenir membre</a></p></section>",
    );
    body.push_str("<section><h2>Actualités</h2>");
    if articles.is_empty() {
        body.push_str("<p class=\"empty\">Aucune actualité pour le moment.</p>");
    }
    for article in &articles {
        body.push_str(&article_card(article));
    }
    body.push_str("</section><section><h2>Projets en cours</h2>");
    if projects.is_empty() {
        body.push_str("<p class=\"empty\">Aucun projet en cours.</p>");
    }
    for project in &projects {
        body.push_str(&project_card(project));
    }
    body.push_str("</section>");
    Ok(public_page("Accueil", &session).body(body).respond())
}

/// Association presentation.
#[get("/about")]
pub async fn about(session: SessionContext) -> HttpResponse {
    public_page("L'association", &session)
        .body(
            "<p>Créée par des bénévoles, Nouveau Souffle organise des maraudes, \
des formations aux premiers secours et soutient des projets d'insertion.</p>\
<p>L'association est reconnue d'intérêt général : vos dons ouvrent droit à une \
réduction d'impôt de 66 %.</p>",
        )
        .respond()
}

/// Contact details.
#[get("/contact")]
pub async fn contact(session: SessionContext) -> HttpResponse {
    public_page("Contact", &session)
        .body(
            "<p>Écrivez-nous à <a href=\"mailto:contact@nouveausouffle.org\">\
contact@nouveausouffle.org</a>.</p><p>Les bénévoles répondent sous quelques jours.</p>",
        )
        .respond()
}

/// Public article list query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListQuery {
    /// Requested page.
    #[serde(default)]
    pub page: Option<String>,
    /// Category slug.
    #[serde(default)]
    pub category: Option<String>,
}

/// Published articles.
#[get("/articles")]
pub async fn articles_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<HttpResponse> {
    let ArticleListQuery { page, category } = query.into_inner();
    let params = ListParams {
        page,
        filters: ArticleFilters::published(crate::domain::non_blank(category)),
    };
    let categories = report(state.articles.categories().await, ReportPolicy::Silent)?
        .ready()
        .unwrap_or_default();
    let port = &state.articles;
    let listing = load_list(params, state.site.page_size, |query| async move {
        port.list(&Credentials::Anonymous, &query).await
    })
    .await?;

    let mut body = String::from("<nav class=\"categories\">");
    body.push_str(&link("/articles", "Toutes"));
    for category in &categories {
        body.push(' ');
        body.push_str(&link(&format!("/articles?category={}", category.slug), &category.name));
    }
    body.push_str("</nav>");
    if listing.rows.is_empty() {
        body.push_str("<p class=\"empty\">Aucun article publié.</p>");
    }
    for article in &listing.rows {
        body.push_str(&article_card(article));
    }
    body.push_str(&listing.pagination("/articles"));
    Ok(public_page("Actualités", &session).body(body).respond())
}

/// One published article.
#[get("/articles/{slug}")]
pub async fn article_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let article = state.articles.by_slug(&slug).await?;
    let mut body = String::new();
    if let Some(at) = &article.published_at {
        body.push_str(&format!("<p class=\"meta\">Publié le {}</p>", format_date(at)));
    }
    body.push_str(&format!("<div class=\"content\">{}</div>", render_markup(&article.content)));
    body.push_str("<p><a href=\"/articles\">Toutes les actualités</a></p>");
    Ok(public_page(&article.title, &session).body(body).respond())
}

/// Projects open to donations.
#[get("/projects")]
pub async fn projects_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListParams<ProjectFilters>>,
) -> ApiResult<HttpResponse> {
    let params = ListParams {
        page: query.into_inner().page,
        filters: ProjectFilters::active(),
    };
    let port = &state.projects;
    let listing = load_list(params, state.site.page_size, |query| async move {
        port.list(&Credentials::Anonymous, &query).await
    })
    .await?;
    let mut body = String::new();
    if listing.rows.is_empty() {
        body.push_str("<p class=\"empty\">Aucun projet en cours.</p>");
    }
    for project in &listing.rows {
        body.push_str(&project_card(project));
    }
    body.push_str(&listing.pagination("/projects"));
    Ok(public_page("Projets", &session).body(body).respond())
}

/// One project.
#[get("/projects/{id}")]
pub async fn project_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let project = state.projects.get(&Credentials::Anonymous, &id).await?;
    let body = format!(
        "{}<div class=\"content\">{}</div><p><a class=\"button\" href=\"/dashboard/donations/new?projectId={}\">Soutenir ce projet</a></p>",
        progress_bar(&project),
        render_markup(&project.description),
        escape(&project.id)
    );
    Ok(public_page(&project.title, &session).body(body).respond())
}

fn event_rows(events: &[Event]) -> String {
    Table::new("Aucun événement à venir.")
        .html_column("Événement", |event: &Event| {
            link(&format!("/events/{}", event.id), &event.title)
        })
        .column("Date", |event| format_datetime(&event.starts_at))
        .column("Lieu", |event| event.location.clone().unwrap_or_default())
        .column("Places", |event| places(event.capacity, event.remaining_places()))
        .render(events)
}

/// Published events.
#[get("/events")]
pub async fn events_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListParams<EventFilters>>,
) -> ApiResult<HttpResponse> {
    let params = ListParams {
        page: query.into_inner().page,
        filters: EventFilters::published(),
    };
    let port = &state.events;
    let listing = load_list(params, state.site.page_size, |query| async move {
        port.list(&Credentials::Anonymous, &query).await
    })
    .await?;
    let body = event_rows(&listing.rows) + &listing.pagination("/events");
    Ok(public_page("Événements", &session).body(body).respond())
}

/// One event, with the registration button for signed-in visitors.
#[get("/events/{id}")]
pub async fn event_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event = state.events.get(&Credentials::Anonymous, &id).await?;
    let mut body = details(&[
        ("Date", format_datetime(&event.starts_at)),
        ("Lieu", event.location.clone().unwrap_or_else(|| "-".to_owned())),
        ("Places", places(event.capacity, event.remaining_places())),
        ("Statut", event.status.label().to_owned()),
    ]);
    body.push_str(&format!("<div class=\"content\">{}</div>", render_markup(&event.description)));
    let action = format!("/dashboard/events/{}/register", event.id);
    if !event.accepts_registrations() {
        body.push_str("<p class=\"notice\">Les inscriptions sont closes.</p>");
    } else if session.has_token() {
        body.push_str(&button_form(&action, "S'inscrire", None));
    } else {
        body.push_str(&format!(
            "<p>{} pour vous inscrire.</p>",
            link(&crate::domain::login_location(&format!("/events/{}", event.id)), "Connectez-vous")
        ));
    }
    Ok(public_page(&event.title, &session).body(body).respond())
}

/// Published trainings.
#[get("/trainings")]
pub async fn trainings_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListParams<TrainingFilters>>,
) -> ApiResult<HttpResponse> {
    let signed_in = session.has_token();
    let params = ListParams {
        page: query.into_inner().page,
        filters: TrainingFilters::published(),
    };
    let port = &state.trainings;
    let listing = load_list(params, state.site.page_size, |query| async move {
        port.list(&Credentials::Anonymous, &query).await
    })
    .await?;
    let table = Table::new("Aucune formation programmée.")
        .column("Formation", |training: &Training| training.title.clone())
        .column("Date", |training| format_datetime(&training.starts_at))
        .column("Durée", |training| {
            training
                .duration_hours
                .map_or_else(|| "-".to_owned(), |hours| format!("{hours} h"))
        })
        .column("Places", |training| {
            places(
                training.capacity,
                training
                    .capacity
                    .map(|capacity| capacity.saturating_sub(training.enrolled_count)),
            )
        })
        .html_column("", move |training| {
            if signed_in && training.accepts_enrollments() {
                button_form(&format!("/dashboard/trainings/{}/enroll", training.id), "S'inscrire", None)
            } else {
                String::new()
            }
        });
    let body = table.render(&listing.rows) + &listing.pagination("/trainings");
    Ok(public_page("Formations", &session).body(body).respond())
}
