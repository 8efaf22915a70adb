// src/views/themes.rs
// DOCUMENTATION: Theme list, creation form, and detail pages

use crate::forms::FormErrors;
use crate::models::{format_taken_at, Photo, Theme, ThemeDetail, User};
use crate::services::StorageBackend;
use crate::views::layout::{self, escape, field_errors, PageFrame};

fn theme_form(action: &str, name: &str, errors: &FormErrors) -> String {
    format!(
        r#"<form method="post" action="{action}">
    <p><label for="id_name">Name</label>
    <input type="text" name="name" id="id_name" maxlength="100" value="{name}" required>
    {errors}</p>
    <button type="submit">Create theme</button>
</form>"#,
        action = action,
        name = escape(name),
        errors = field_errors(errors, "name"),
    )
}

/// Requester's themes plus an inline creation form posting back to /
pub fn home_page(frame: &PageFrame, themes: &[Theme], name: &str, errors: &FormErrors) -> String {
    let list = if themes.is_empty() {
        "<p>You have no themes yet.</p>".to_string()
    } else {
        let items: String = themes
            .iter()
            .map(|t| {
                format!(
                    r#"<li><a href="/theme/{id}/">{name}</a> <small>{created}</small> <a href="/theme/{id}/map/">map</a></li>"#,
                    id = t.id,
                    name = escape(&t.name),
                    created = t.created_at.format("%Y-%m-%d"),
                )
            })
            .collect();
        format!(r#"<ul class="themes">{}</ul>"#, items)
    };

    let greeting = frame
        .user
        .map(|u: &User| format!("<p>Welcome, {}.</p>", escape(&u.username)))
        .unwrap_or_default();

    let body = format!(
        "<h1>My themes</h1>\n{}\n{}\n<h2>New theme</h2>\n{}",
        greeting,
        list,
        theme_form("/", name, errors)
    );
    layout::page(frame, "My themes", "", &body)
}

pub fn create_page(frame: &PageFrame, name: &str, errors: &FormErrors) -> String {
    let body = format!(
        "<h1>Create a theme</h1>\n{}",
        theme_form("/theme/create/", name, errors)
    );
    layout::page(frame, "Create a theme", "", &body)
}

fn photo_card(photo: &Photo, media: &dyn StorageBackend, viewer: Option<&User>) -> String {
    let delete = match viewer {
        Some(user) if user.id == photo.user_id => {
            format!(r#" <a href="/photo/{}/delete/">Delete</a>"#, photo.id)
        }
        _ => String::new(),
    };
    format!(
        r#"<div class="photo"><img src="{url}" alt="{caption}"><p>{caption} <small>{date}</small>{delete}</p></div>"#,
        url = escape(&media.url(&photo.image)),
        caption = escape(&photo.caption),
        date = format_taken_at(photo.taken_at),
        delete = delete,
    )
}

/// Every photo of the theme, then each location with its own photos
pub fn detail_page(frame: &PageFrame, detail: &ThemeDetail, media: &dyn StorageBackend) -> String {
    let theme = &detail.theme;

    let photos: String = if detail.photos.is_empty() {
        "<p>No photos yet.</p>".to_string()
    } else {
        detail
            .photos
            .iter()
            .map(|p| photo_card(p, media, frame.user))
            .collect()
    };

    let locations: String = detail
        .locations
        .iter()
        .map(|entry| {
            let loc = &entry.location;
            let cards: String = entry
                .photos
                .iter()
                .map(|p| photo_card(p, media, frame.user))
                .collect();
            format!(
                r#"<section class="location">
    <h3>{name} <small>({lat:.6}, {lng:.6})</small></h3>
    <p><a href="/theme/{theme_id}/upload/?location={id}">Add photo here</a> <a href="/location/{id}/edit/">Edit</a> <a href="/location/{id}/delete/">Delete</a></p>
    {cards}
</section>"#,
                name = escape(&loc.name),
                lat = loc.latitude,
                lng = loc.longitude,
                theme_id = theme.id,
                id = loc.id,
                cards = cards,
            )
        })
        .collect();

    let body = format!(
        r#"<h1>{name}</h1>
<p><a href="/theme/{id}/upload/">Upload photo</a> <a href="/theme/{id}/map/">View map</a></p>
<h2>Photos</h2>
{photos}
<h2>Locations</h2>
{locations}"#,
        name = escape(&theme.name),
        id = theme.id,
        photos = photos,
        locations = locations,
    );
    layout::page(frame, &theme.name, "", &body)
}
