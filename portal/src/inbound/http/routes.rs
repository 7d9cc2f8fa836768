//! Route table of the rendered portal.
//!
//! Literal segments such as `/new` are registered before the `{id}` routes
//! sharing their prefix, so they are never captured as identifiers.

use actix_web::web;

use super::{admin, auth, maraude, member, public, seo};

/// Register every page and form handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public::home)
        .service(public::about)
        .service(public::contact)
        .service(public::articles_page)
        .service(public::article_page)
        .service(public::projects_page)
        .service(public::project_page)
        .service(public::events_page)
        .service(public::event_page)
        .service(public::trainings_page)
        .service(seo::sitemap)
        .service(seo::robots);

    cfg.service(auth::login_page)
        .service(auth::login)
        .service(auth::register_page)
        .service(auth::register)
        .service(auth::logout_page)
        .service(auth::logout)
        .service(auth::forgot_password_page)
        .service(auth::forgot_password);

    configure_member(cfg);
    configure_admin(cfg);
    configure_maraude(cfg);
}

fn configure_member(cfg: &mut web::ServiceConfig) {
    use member::{activities, dashboard, donations, membership};

    cfg.service(dashboard::dashboard)
        .service(membership::show)
        .service(membership::create)
        .service(membership::renew)
        .service(donations::list)
        .service(donations::new_donation)
        .service(donations::confirmation)
        .service(donations::create)
        .service(donations::annual_receipt)
        .service(activities::registrations)
        .service(activities::register)
        .service(activities::unregister)
        .service(activities::enrollments)
        .service(activities::enroll);
}

fn configure_admin(cfg: &mut web::ServiceConfig) {
    use admin::{articles, donations, events, memberships, overview, projects, trainings, users};

    cfg.service(overview::overview)
        .service(articles::list)
        .service(articles::new_article)
        .service(articles::create)
        .service(articles::edit)
        .service(articles::update)
        .service(articles::delete)
        .service(projects::list)
        .service(projects::new_project)
        .service(projects::create)
        .service(projects::edit)
        .service(projects::update)
        .service(projects::delete)
        .service(events::list)
        .service(events::new_event)
        .service(events::create)
        .service(events::edit)
        .service(events::update)
        .service(events::delete)
        .service(trainings::list)
        .service(trainings::new_training)
        .service(trainings::create)
        .service(trainings::edit)
        .service(trainings::update)
        .service(trainings::delete)
        .service(donations::list)
        .service(memberships::list)
        .service(memberships::change_status)
        .service(users::list)
        .service(users::change_role);
}

fn configure_maraude(cfg: &mut web::ServiceConfig) {
    use maraude::{beneficiaries, reference, sessions};

    cfg.service(sessions::list)
        .service(sessions::new_session)
        .service(sessions::create)
        .service(sessions::detail)
        .service(sessions::add_encounter)
        .service(beneficiaries::list)
        .service(beneficiaries::new_beneficiary)
        .service(beneficiaries::create)
        .service(beneficiaries::edit)
        .service(beneficiaries::update)
        .service(reference::zones)
        .service(reference::create_zone)
        .service(reference::delete_zone)
        .service(reference::categories)
        .service(reference::create_category)
        .service(reference::delete_category);
}
