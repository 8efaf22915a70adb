// src/views/auth.rs
// DOCUMENTATION: Signup and login pages

use crate::forms::FormErrors;
use crate::models::SignupForm;
use crate::views::layout::{self, escape, field_errors, non_field_errors, PageFrame};

pub fn signup_page(frame: &PageFrame, form: &SignupForm, errors: &FormErrors) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="/signup/">
    {non_field}
    <p><label for="id_username">Username</label>
    <input type="text" name="username" id="id_username" maxlength="150" value="{username}" required>
    {username_errors}</p>
    <p><label for="id_email">Email</label>
    <input type="email" name="email" id="id_email" value="{email}" required>
    {email_errors}</p>
    <p><label for="id_password1">Password</label>
    <input type="password" name="password1" id="id_password1" required>
    {password1_errors}</p>
    <p><label for="id_password2">Password confirmation</label>
    <input type="password" name="password2" id="id_password2" required>
    {password2_errors}</p>
    <button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/accounts/login/">Log in</a></p>"#,
        non_field = non_field_errors(errors),
        username = escape(&form.username),
        username_errors = field_errors(errors, "username"),
        email = escape(&form.email),
        email_errors = field_errors(errors, "email"),
        password1_errors = field_errors(errors, "password1"),
        password2_errors = field_errors(errors, "password2"),
    );
    layout::page(frame, "Sign up", "", &body)
}

/// `next` is carried through a hidden field
pub fn login_page(frame: &PageFrame, username: &str, next: &str, errors: &FormErrors) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="/accounts/login/">
    {non_field}
    <p><label for="id_username">Username</label>
    <input type="text" name="username" id="id_username" value="{username}" required></p>
    <p><label for="id_password">Password</label>
    <input type="password" name="password" id="id_password" required></p>
    <input type="hidden" name="next" value="{next}">
    <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup/">Sign up</a></p>"#,
        non_field = non_field_errors(errors),
        username = escape(username),
        next = escape(next),
    );
    layout::page(frame, "Log in", "", &body)
}
