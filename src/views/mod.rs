pub mod badge;
pub mod nav;

use axum::response::Html;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::AuthUser;
use self::badge::{progress_tier, workload_tier, Tone};
use self::nav::Screen;

/// One dashboard screen ready to be dropped into the layout template.
pub struct Page<'a> {
    pub title: &'a str,
    pub active: Screen,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
    // (seconds, url): reload target once a success banner has been shown
    pub refresh: Option<(u64, &'a str)>,
    pub body: String,
}

impl<'a> Page<'a> {
    pub fn new(active: Screen, title: &'a str, body: String) -> Self {
        Self { title, active, error: None, notice: None, refresh: None, body }
    }
}

pub fn load_template(config: &Config, name: &str) -> AppResult<String> {
    let path = format!("{}/{}", config.templates.dir, name);
    std::fs::read_to_string(&path).map_err(|e| {
        tracing::error!("Failed to read template {}: {}", path, e);
        AppError::File(e)
    })
}

pub fn render_page(config: &Config, user: &AuthUser, page: Page<'_>) -> AppResult<Html<String>> {
    let layout = load_template(config, "layout.html")?;

    let nav = Screen::menu(user.role)
        .iter()
        .map(|screen| {
            let class = if *screen == page.active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, screen.path(), class, screen.label())
        })
        .collect::<Vec<_>>()
        .join("\n");

    let head = page
        .refresh
        .map(|(seconds, url)| {
            format!(r#"<meta http-equiv="refresh" content="{}; url={}">"#, seconds, escape(url))
        })
        .unwrap_or_default();

    let mut flash = String::new();
    if let Some(error) = page.error {
        flash.push_str(&format!(r#"<div class="alert alert-error">{}</div>"#, escape(error)));
    }
    if let Some(notice) = page.notice {
        flash.push_str(&format!(r#"<div class="alert alert-success">{}</div>"#, escape(notice)));
    }

    // Visitor-supplied text goes in last so it can never reach another placeholder.
    let html = layout
        .replace("{{head}}", &head)
        .replace("{{role}}", user.role.label())
        .replace("{{nav}}", &nav)
        .replace("{{content}}", &page.body)
        .replace("{{title}}", &escape(page.title))
        .replace("{{user_name}}", &escape(&user.name))
        .replace("{{flash}}", &flash);
    Ok(Html(html))
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn badge(tone: Tone, label: &str) -> String {
    format!(r#"<span class="{}">{}</span>"#, tone.css_class(), escape(label))
}

pub fn progress_bar(percent: u8) -> String {
    format!(
        r#"<div class="progress"><div class="{}" style="width: {}%"></div></div>"#,
        progress_tier(percent).css_class(),
        percent.min(100)
    )
}

pub fn workload_bar(percent: u8) -> String {
    format!(
        r#"<div class="progress"><div class="{}" style="width: {}%"></div></div><span class="muted">{}%</span>"#,
        workload_tier(percent).css_class(),
        percent.min(100),
        percent
    )
}

/// `<option>` list with `selected` on the matching value.
pub fn options<'a>(items: impl Iterator<Item = (&'a str, String)>, selected: &str) -> String {
    items
        .map(|(value, label)| {
            let mark = if value == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, escape(value), mark, escape(&label))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(escape("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
        assert_eq!(escape("{{nav}}"), "&#123;&#123;nav&#125;&#125;");
    }

    #[test]
    fn flash_text_cannot_pull_in_page_body() {
        let config = Config::for_tests();
        let user = AuthUser {
            id: "u4".into(),
            name: "Emily Davis".into(),
            email: "emily.davis@example.com".into(),
            role: Role::Member,
        };
        let mut page = Page::new(Screen::Dashboard, "Dashboard", "<p>body</p>".into());
        page.error = Some("{{content}}");
        let Html(html) = render_page(&config, &user, page).unwrap();
        assert_eq!(html.matches("<p>body</p>").count(), 1);
    }

    #[test]
    fn layout_shows_role_menu_and_marks_active_screen() {
        let config = Config::for_tests();
        let user = AuthUser {
            id: "u4".into(),
            name: "Emily Davis".into(),
            email: "emily.davis@example.com".into(),
            role: Role::Member,
        };
        let page = Page::new(Screen::Tasks, "Tasks", "<p>body</p>".into());
        let Html(html) = render_page(&config, &user, page).unwrap();

        assert!(html.contains(r#"<a href="/dashboard/tasks" class="active">Tasks</a>"#));
        assert!(!html.contains("/dashboard/add-admin"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("Emily Davis"));
    }

    #[test]
    fn refresh_adds_meta_tag() {
        let config = Config::for_tests();
        let user = AuthUser {
            id: "u1".into(),
            name: "Alex Morgan".into(),
            email: "alex.morgan@example.com".into(),
            role: Role::Admin,
        };
        let mut page = Page::new(Screen::AddAdmin, "Add Admin", String::new());
        page.refresh = Some((3, "/dashboard/add-admin"));
        let Html(html) = render_page(&config, &user, page).unwrap();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="3; url=/dashboard/add-admin">"#));
    }
}
