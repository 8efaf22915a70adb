// src/views/locations.rs
// DOCUMENTATION: Location edit and delete confirmation pages

use crate::forms::FormErrors;
use crate::models::{Location, LocationForm};
use crate::views::layout::{self, escape, field_errors, non_field_errors, PageFrame};

pub fn edit_page(
    frame: &PageFrame,
    location: &Location,
    form: &LocationForm,
    errors: &FormErrors,
) -> String {
    let body = format!(
        r#"<h1>Edit {current}</h1>
<form method="post" action="/location/{id}/edit/">
    {non_field}
    <p><label for="id_name">Name</label>
    <input type="text" name="name" id="id_name" maxlength="100" value="{name}" required>
    {name_errors}</p>
    <p><label for="id_latitude">Latitude</label>
    <input type="number" step="any" name="latitude" id="id_latitude" value="{latitude}" required>
    {latitude_errors}</p>
    <p><label for="id_longitude">Longitude</label>
    <input type="number" step="any" name="longitude" id="id_longitude" value="{longitude}" required>
    {longitude_errors}</p>
    <button type="submit">Save</button>
</form>
<p><a href="/theme/{theme_id}/">Cancel</a></p>"#,
        current = escape(&location.name),
        id = location.id,
        non_field = non_field_errors(errors),
        name = escape(&form.name),
        name_errors = field_errors(errors, "name"),
        latitude = escape(&form.latitude),
        latitude_errors = field_errors(errors, "latitude"),
        longitude = escape(&form.longitude),
        longitude_errors = field_errors(errors, "longitude"),
        theme_id = location.theme_id,
    );
    layout::page(frame, "Edit location", "", &body)
}

pub fn confirm_delete_page(frame: &PageFrame, location: &Location, photo_count: usize) -> String {
    let body = format!(
        r#"<h1>Delete {name}?</h1>
<p>This also deletes the {count} photo(s) taken at this location.</p>
<form method="post" action="/location/{id}/delete/">
    <button type="submit">Delete</button>
    <a href="/theme/{theme_id}/">Cancel</a>
</form>"#,
        name = escape(&location.name),
        count = photo_count,
        id = location.id,
        theme_id = location.theme_id,
    );
    layout::page(frame, "Delete location", "", &body)
}
