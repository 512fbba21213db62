//! Minimal HTML views served alongside the JSON API

use axum::response::Html;

/// Wraps page content in the shared document shell.
fn base_template(title: &str, content: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} - Cinedeck</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
    <main>
{content}
    </main>
</body>
</html>"#
    ))
}

pub async fn home_page() -> Html<String> {
    base_template(
        "Home",
        r#"        <h1>Cinedeck</h1>
        <p>Browse the catalog through <a href="/api/home">/api/home</a>.</p>"#,
    )
}

pub async fn login_page() -> Html<String> {
    base_template(
        "Sign in",
        r#"        <h1>Sign in</h1>
        <p>Sign in with your identity provider to continue.</p>
        <p><a href="/register">Create an account</a></p>"#,
    )
}

pub async fn register_page() -> Html<String> {
    base_template(
        "Create account",
        r#"        <h1>Create account</h1>
        <p>Accounts are managed by your identity provider.</p>
        <p><a href="/login">Already have an account?</a></p>"#,
    )
}
