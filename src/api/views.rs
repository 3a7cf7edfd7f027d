//! Server-rendered pages.
//!
//! Markup is assembled by hand; every piece of user-supplied text passes
//! through [`escape`] before it is interpolated.

use crate::api::flash::Flash;
use crate::db::{Idea, User};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&User>, flash: Option<Flash>, body: &str) -> String {
    let nav = match user {
        Some(user) => {
            let badge = if user.subscription_status {
                r#" <span class="badge">subscribed</span>"#
            } else {
                r#" <a href="/subscribe">Subscribe</a>"#
            };
            format!(
                r#"Signed in as <strong>{}</strong>{} | <a href="/share">Share an idea</a> | <a href="/logout">Log out</a>"#,
                escape(&user.username),
                badge,
            )
        }
        None => r#"<a href="/login">Log in</a> | <a href="/register">Register</a>"#.to_string(),
    };

    let flash = flash
        .map(|f| format!(r#"<p class="flash">{}</p>"#, escape(f.message())))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav><a href="/">Ideas</a> | {nav}</nav>
{flash}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn error_line(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn home(ideas: &[Idea], user: Option<&User>, flash: Option<Flash>) -> String {
    let body = if ideas.is_empty() {
        "<p>No ideas yet.</p>".to_string()
    } else {
        let items: String = ideas
            .iter()
            .map(|idea| {
                format!(
                    "<li><h3>{}</h3><p>{}</p><small>by {}</small></li>\n",
                    escape(&idea.title),
                    escape(&idea.content),
                    escape(&idea.author),
                )
            })
            .collect();
        format!("<ul>\n{}</ul>", items)
    };

    layout("Ideas", user, flash, &format!("<h1>Ideas</h1>\n{}", body))
}

pub fn register(error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{}
<form method="post" action="/register">
<label>Username <input name="username" maxlength="80" required></label>
<label>Email <input name="email" type="email" maxlength="120" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Register</button>
</form>"#,
        error_line(error),
    );
    layout("Register", None, None, &body)
}

pub fn login(error: Option<&str>, flash: Option<Flash>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{}
<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        error_line(error),
    );
    layout("Log in", None, flash, &body)
}

pub fn share(user: &User, error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Share an idea</h1>
{}
<form method="post" action="/share">
<label>Title <input name="title" maxlength="100" required></label>
<label>Content <textarea name="content" required></textarea></label>
<button type="submit">Share</button>
</form>"#,
        error_line(error),
    );
    layout("Share", Some(user), None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_home_escapes_ideas() {
        let ideas = vec![Idea {
            id: 1,
            title: "<b>bold</b>".to_string(),
            content: "Body1".to_string(),
            user_id: 1,
            author: "alice".to_string(),
        }];

        let html = home(&ideas, None, Some(Flash::Subscribed));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("by alice"));
        assert!(html.contains("Successfully subscribed!"));
        assert!(html.contains(r#"href="/login""#));
    }
}
