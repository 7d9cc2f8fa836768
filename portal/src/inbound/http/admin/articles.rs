//! News article management.
//!
//! ```text
//! GET  /admin/articles              Filtered list
//! GET  /admin/articles/new          Creation form
//! POST /admin/articles              Create
//! GET  /admin/articles/{id}/edit    Edit form
//! POST /admin/articles/{id}         Update
//! POST /admin/articles/{id}/delete  Delete
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::{admin_page, rejected_form, required_choice, row_actions, submitted};
use crate::domain::models::{
    Article, ArticleCategory, ArticleDraft, ArticleFilters, ArticleStatus, format_optional_date,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::report::{ReportPolicy, report};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/articles";

fn to_form(draft: &ArticleDraft) -> FormData {
    let mut data = FormData::from_pairs([
        ("title", draft.title.clone()),
        ("slug", draft.slug.clone().unwrap_or_default()),
        ("excerpt", draft.excerpt.clone().unwrap_or_default()),
        ("content", draft.content.clone()),
        ("status", draft.status.as_str().to_owned()),
    ]);
    for id in &draft.category_ids {
        data.set(&format!("category-{id}"), "on");
    }
    data
}

fn parse(data: &mut FormData) -> Option<ArticleDraft> {
    let title = data.required("title");
    let content = data.required("content");
    let status = required_choice(data, "status", ArticleStatus::parse);
    let draft = ArticleDraft {
        title,
        slug: data.optional("slug"),
        excerpt: data.optional("excerpt"),
        content,
        status: status?,
        category_ids: data.checked_ids("category"),
    };
    data.is_valid().then_some(draft)
}

fn form(action: &str, data: &FormData, categories: &[ArticleCategory]) -> String {
    let categories: Vec<(&str, &str)> = categories
        .iter()
        .map(|category| (category.id.as_str(), category.name.as_str()))
        .collect();
    Form::post(action, data)
        .text("title", "Titre", true)
        .text("slug", "Adresse (laisser vide pour la générer)", false)
        .textarea("excerpt", "Chapô", false)
        .textarea("content", "Contenu (Markdown)", true)
        .select("status", "Statut", &ArticleStatus::options(), true)
        .checkboxes("category", "Catégories", &categories)
        .submit("Enregistrer")
        .render()
}

async fn categories(state: &HttpState) -> ApiResult<Vec<ArticleCategory>> {
    Ok(report(state.articles.categories().await, ReportPolicy::Silent)?
        .ready()
        .unwrap_or_default())
}

/// Filtered article list.
#[get("/admin/articles")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<ArticleFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let categories = categories(&state).await?;
    let port = &state.articles;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;

    let category_options: Vec<(&str, &str)> = categories
        .iter()
        .map(|category| (category.slug.as_str(), category.name.as_str()))
        .collect();
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Recherche", false)
        .select("status", "Statut", &ArticleStatus::options(), false)
        .select("category", "Catégorie", &category_options, false)
        .render();
    let table = Table::new("Aucun article ne correspond à ces critères.")
        .column("Titre", |article: &Article| article.title.clone())
        .column("Statut", |article: &Article| article.status.label().to_owned())
        .column("Publication", |article: &Article| {
            format_optional_date(article.published_at.as_ref())
        })
        .html_column("", |article: &Article| row_actions(BASE, &article.id));
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/articles/new", "Nouvel article"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Articles").body(body).respond())
}

/// Blank creation form.
#[get("/admin/articles/new")]
pub async fn new_article(state: web::Data<HttpState>, admin: AdminSession) -> ApiResult<HttpResponse> {
    let categories = categories(&state).await?;
    let body = form(BASE, &to_form(&ArticleDraft::default()), &categories);
    Ok(admin_page(&admin, "Nouvel article").body(body).respond())
}

/// Create an article.
#[post("/admin/articles")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.articles.create(&admin.credentials(), &draft).await),
        None => None,
    };
    match submitted(admin.context(), &mut data, result, "Article enregistré.")? {
        Ok(_) => Ok(see_other(BASE)),
        Err(banner) => {
            let categories = categories(&state).await?;
            Ok(rejected_form(
                admin_page(&admin, "Nouvel article"),
                banner,
                form(BASE, &data, &categories),
            ))
        }
    }
}

/// Edit form.
#[get("/admin/articles/{id}/edit")]
pub async fn edit(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let article = state.articles.get(&admin.credentials(), &id).await?;
    let categories = categories(&state).await?;
    let body = form(
        &format!("{BASE}/{}", article.id),
        &to_form(&ArticleDraft::from(&article)),
        &categories,
    );
    Ok(admin_page(&admin, &article.title).body(body).respond())
}

/// Update an article.
#[post("/admin/articles/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.articles.update(&admin.credentials(), &id, &draft).await),
        None => None,
    };
    match submitted(admin.context(), &mut data, result, "Article mis à jour.")? {
        Ok(_) => Ok(see_other(BASE)),
        Err(banner) => {
            let categories = categories(&state).await?;
            Ok(rejected_form(
                admin_page(&admin, "Modifier l'article"),
                banner,
                form(&format!("{BASE}/{id}"), &data, &categories),
            ))
        }
    }
}

/// Delete an article.
#[post("/admin/articles/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.articles.delete(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, "Article supprimé.")?;
    Ok(see_other(BASE))
}
