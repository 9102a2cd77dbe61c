use maud::{DOCTYPE, Markup, html};
use tenfold_client::Session;

use crate::UiState;

impl UiState {
    /// Html page header
    pub(crate) fn render_html_head(&self, page_title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en";
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                link rel="stylesheet" type="text/css" href="/assets/style.css";
                title { (page_title) }
            }
        }
    }

    pub(crate) fn render_html_page(&self, title: &str, content: Markup) -> Markup {
        html! {
            (self.render_html_head(title))
            body ."o-body" {
                div ."o-pageLayout" { (content) }
            }
        }
    }

    /// Standard two-column layout: navbar plus main content.
    pub(crate) fn render_page_layout(&self, navbar: Markup, main_content: Markup) -> Markup {
        html! {
            (navbar)
            main ."o-mainBar" {
                (main_content)
            }
        }
    }

    /// Left navigation; `active` names the highlighted entry.
    pub(crate) fn render_navbar(&self, session: &Session, active: &str) -> Markup {
        let entries: &[(&str, &str, &str)] = &[
            ("dashboard", "/", "Dashboard"),
            ("contacts", "/contacts", "Contacts"),
            ("leads", "/leads", "Leads"),
            ("opportunities", "/opportunities", "Opportunities"),
        ];

        html! {
            nav ."o-navBar" {
                div ."o-navBar__brand" { "tenfold" }

                div ."o-navBar__links" {
                    @for (key, href, label) in entries {
                        a ."o-navBar__item"
                            ."-active"[active == *key]
                            href=(href)
                        {
                            (label)
                        }
                    }
                    @if session.is_admin() {
                        a ."o-navBar__item"
                            ."-active"[active == "admin"]
                            href="/admin"
                        {
                            "Administration"
                        }
                    }
                }

                div ."o-navBar__session" {
                    @if let Some(user) = session.user() {
                        span ."o-navBar__user" { (user.email) }
                        @if session.is_admin() {
                            span ."o-navBar__role -admin" { "superuser" }
                        } @else if let Some(tenant_id) = session.tenant_id() {
                            span ."o-navBar__role" { "tenant " (tenant_id) }
                        }
                    }
                    form action="/logout" method="post" {
                        button ."o-navBar__logout u-button" type="submit" { "Sign out" }
                    }
                }
            }
        }
    }

    /// A page in the standard console chrome.
    pub(crate) fn render_console_page(
        &self,
        session: &Session,
        active: &str,
        title: &str,
        body: Markup,
    ) -> Markup {
        let navbar = self.render_navbar(session, active);
        let main_content = html! {
            div ."o-content" {
                h2 ."o-content__header" { (title) }
                (body)
            }
        };
        self.render_html_page(title, self.render_page_layout(navbar, main_content))
    }
}

/// One-line notice, e.g. a login failure message.
pub(crate) fn render_notice(message: &str) -> Markup {
    html! {
        div ."o-notice -error" { (message) }
    }
}
