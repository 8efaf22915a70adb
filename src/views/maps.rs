// src/views/maps.rs
// DOCUMENTATION: Map page of a theme
// PURPOSE: Embed the map payload and load the Maps script with the configured key

use crate::models::{MapLocation, Theme};
use crate::views::layout::{self, escape, json_for_script, PageFrame};

pub fn map_page(
    frame: &PageFrame,
    theme: &Theme,
    locations: &[MapLocation],
    maps_api_key: &str,
) -> String {
    let head = format!(
        r#"<script src="https://maps.googleapis.com/maps/api/js?key={}&callback=initMap" async defer></script>"#,
        escape(&urlencoding::encode(maps_api_key))
    );

    let body = format!(
        r#"<h1>{name} map</h1>
<p><a href="/theme/{id}/">Back to {name}</a></p>
<div id="map"></div>
<div id="photos"></div>
<script>
const locationsData = {data};
function escapeHtml(s) {{
    return String(s).replace(/[&<>"']/g, c => ({{ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#x27;' }})[c]);
}}
function showPhotos(loc) {{
    const panel = document.getElementById('photos');
    panel.innerHTML = '<h2>' + escapeHtml(loc.name) + '</h2>' + loc.photos.map(p =>
        '<div class="photo"><img src="' + escapeHtml(p.url) + '" alt="' + escapeHtml(p.caption) + '">' +
        '<p>' + escapeHtml(p.caption) + ' <small>' + escapeHtml(p.date) + '</small></p></div>'
    ).join('');
}}
function initMap() {{
    const map = new google.maps.Map(document.getElementById('map'), {{ center: {{ lat: 35.6762, lng: 139.6503 }}, zoom: 10 }});
    const bounds = new google.maps.LatLngBounds();
    locationsData.forEach(loc => {{
        const marker = new google.maps.Marker({{ position: {{ lat: loc.lat, lng: loc.lng }}, map: map, title: loc.name }});
        marker.addListener('click', () => showPhotos(loc));
        bounds.extend(marker.getPosition());
    }});
    if (locationsData.length > 0) map.fitBounds(bounds);
}}
</script>"#,
        name = escape(&theme.name),
        id = theme.id,
        data = json_for_script(locations),
    );
    layout::page(frame, &format!("{} map", theme.name), &head, &body)
}
