// src/views/upload.rs
// DOCUMENTATION: Photo upload page
// PURPOSE: Photo fields, existing-location select, inline new-location fields,
// and the JSON the map picker reads

use serde::Serialize;
use std::collections::BTreeMap;

use crate::forms::{FormErrors, UploadFormValues};
use crate::models::{Location, LocationOption, Theme};
use crate::views::layout::{self, escape, field_errors, json_for_script, non_field_errors, PageFrame};

#[derive(Debug, Serialize)]
struct Coords {
    latitude: f64,
    longitude: f64,
}

/// Everything the upload page renders besides the frame
pub struct UploadPage<'a> {
    pub theme: &'a Theme,
    pub locations: &'a [Location],
    pub values: &'a UploadFormValues,
    pub errors: &'a FormErrors,
    /// Location the form opens with, if any
    pub initial_location: Option<&'a Location>,
    pub maps_api_key: &'a str,
}

impl UploadPage<'_> {
    /// [{id, name, latitude, longitude}] of every location of the theme
    pub fn locations_json(&self) -> String {
        let options: Vec<LocationOption> = self.locations.iter().map(|l| l.to_option()).collect();
        json_for_script(&options)
    }

    /// {"<id>": {latitude, longitude}} for the select's data-coords attribute
    pub fn coords_json(&self) -> String {
        let coords: BTreeMap<String, Coords> = self
            .locations
            .iter()
            .map(|l| {
                (
                    l.id.to_string(),
                    Coords {
                        latitude: l.latitude,
                        longitude: l.longitude,
                    },
                )
            })
            .collect();
        json_for_script(&coords)
    }

    /// The pre-selected location as JSON, or the literal null
    pub fn initial_location_json(&self) -> String {
        match self.initial_location {
            Some(location) => json_for_script(&location.to_option()),
            None => "null".to_string(),
        }
    }

    fn location_select(&self) -> String {
        let selected_id = self
            .initial_location
            .map(|l| l.id.to_string())
            .unwrap_or_else(|| self.values.location.trim().to_string());
        let options: String = self
            .locations
            .iter()
            .map(|l| {
                let id = l.id.to_string();
                let selected = if id == selected_id { " selected" } else { "" };
                format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    id,
                    selected,
                    escape(&l.name)
                )
            })
            .collect();
        format!(
            r#"<select name="location" id="id_location" data-coords="{coords}">
        <option value="">Create a new location</option>{options}
    </select>"#,
            coords = escape(&self.coords_json()),
            options = options,
        )
    }

    pub fn render(&self, frame: &PageFrame) -> String {
        let v = self.values;
        let e = self.errors;

        let head = if self.maps_api_key.is_empty() {
            String::new()
        } else {
            format!(
                r#"<script src="https://maps.googleapis.com/maps/api/js?key={}&callback=initUploadMap" async defer></script>"#,
                escape(&urlencoding::encode(self.maps_api_key))
            )
        };

        let body = format!(
            r#"<h1>Upload a photo to {theme_name}</h1>
<form method="post" action="/theme/{theme_id}/upload/" enctype="multipart/form-data">
    {non_field}
    <fieldset>
        <legend>Photo</legend>
        <p><label for="id_image">Image</label>
        <input type="file" name="image" id="id_image" accept="image/*" required>
        {image_errors}</p>
        <p><label for="id_caption">Caption</label>
        <input type="text" name="caption" id="id_caption" maxlength="200" value="{caption}">
        {caption_errors}</p>
        <p><label for="id_taken_at">Taken at</label>
        <input type="datetime-local" name="taken_at" id="id_taken_at" value="{taken_at}" required>
        {taken_at_errors}</p>
    </fieldset>
    <fieldset>
        <legend>Location</legend>
        <p><label for="id_location">Existing location</label>
        {select}
        {location_errors}</p>
        <p><label for="id_name">New location name</label>
        <input type="text" name="name" id="id_name" maxlength="100" value="{name}">
        {name_errors}</p>
        <p><label for="id_latitude">Latitude</label>
        <input type="number" step="any" name="latitude" id="id_latitude" value="{latitude}">
        {latitude_errors}</p>
        <p><label for="id_longitude">Longitude</label>
        <input type="number" step="any" name="longitude" id="id_longitude" value="{longitude}">
        {longitude_errors}</p>
        <div id="map"></div>
    </fieldset>
    <button type="submit">Upload</button>
</form>
<p><a href="/theme/{theme_id}/">Back to {theme_name}</a></p>
<script>
const locations = {locations_json};
const initialLocation = {initial_location};
const select = document.getElementById('id_location');
const latInput = document.getElementById('id_latitude');
const lngInput = document.getElementById('id_longitude');
let marker = null;
function fillFromSelect() {{
    const coords = JSON.parse(select.dataset.coords)[select.value];
    if (coords) {{
        latInput.value = coords.latitude;
        lngInput.value = coords.longitude;
    }}
}}
select.addEventListener('change', fillFromSelect);
function initUploadMap() {{
    const start = initialLocation || locations[0] || {{ latitude: 35.6762, longitude: 139.6503 }};
    const center = {{ lat: start.latitude, lng: start.longitude }};
    const map = new google.maps.Map(document.getElementById('map'), {{ center: center, zoom: 10 }});
    locations.forEach(loc => new google.maps.Marker({{ position: {{ lat: loc.latitude, lng: loc.longitude }}, map: map, title: loc.name }}));
    map.addListener('click', event => {{
        select.value = '';
        latInput.value = event.latLng.lat().toFixed(6);
        lngInput.value = event.latLng.lng().toFixed(6);
        if (marker) marker.setMap(null);
        marker = new google.maps.Marker({{ position: event.latLng, map: map }});
    }});
}}
if (initialLocation) {{
    latInput.value = initialLocation.latitude;
    lngInput.value = initialLocation.longitude;
}}
</script>"#,
            theme_name = escape(&self.theme.name),
            theme_id = self.theme.id,
            non_field = non_field_errors(e),
            image_errors = field_errors(e, "image"),
            caption = escape(&v.caption),
            caption_errors = field_errors(e, "caption"),
            taken_at = escape(&v.taken_at),
            taken_at_errors = field_errors(e, "taken_at"),
            select = self.location_select(),
            location_errors = field_errors(e, "location"),
            name = escape(&v.name),
            name_errors = field_errors(e, "name"),
            latitude = escape(&v.latitude),
            latitude_errors = field_errors(e, "latitude"),
            longitude = escape(&v.longitude),
            longitude_errors = field_errors(e, "longitude"),
            locations_json = self.locations_json(),
            initial_location = self.initial_location_json(),
        );
        layout::page(frame, "Upload photo", &head, &body)
    }
}
