// src/views/photos.rs
// DOCUMENTATION: Photo delete confirmation page

use crate::models::{format_taken_at, Photo};
use crate::views::layout::{self, escape, PageFrame};

pub fn confirm_delete_page(frame: &PageFrame, photo: &Photo, url: &str) -> String {
    let body = format!(
        r#"<h1>Delete this photo?</h1>
<div class="photo"><img src="{url}" alt="{caption}"><p>{caption} <small>{date}</small></p></div>
<form method="post" action="/photo/{id}/delete/">
    <button type="submit">Delete</button>
    <a href="/theme/{theme_id}/">Cancel</a>
</form>"#,
        url = escape(url),
        caption = escape(&photo.caption),
        date = format_taken_at(photo.taken_at),
        id = photo.id,
        theme_id = photo.theme_id,
    );
    layout::page(frame, "Delete photo", "", &body)
}
