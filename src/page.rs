// page.rs
use std::fmt::Write;

use crate::{devices::COLOR_PRESETS, models::Preset, utils::escape_html};

/// Renders the simulator page shell.
///
/// The preset list is embedded as JSON for the script and also rendered as
/// plain markup so the page is usable before the socket connects.
pub fn render_simulator_page(presets: &[Preset]) -> Result<String, serde_json::Error> {
    // `</` would end the script element early.
    let presets_json = serde_json::to_string(presets)?.replace("</", "<\\/");
    let colors_json = serde_json::to_string(&COLOR_PRESETS)?.replace("</", "<\\/");

    let mut items = String::new();
    for preset in presets {
        let _ = write!(
            items,
            r#"<li><button type="button" data-preset-id="{id}">{name}</button> <span class="device device-{device}">{device}</span></li>"#,
            id = preset.id,
            name = escape_html(&preset.name),
            device = preset.device,
        );
    }
    if items.is_empty() {
        items.push_str(r#"<li class="empty">No presets saved yet.</li>"#);
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Smart Home Sandbox</title>
<link rel="stylesheet" href="/static/simulator.css">
</head>
<body>
<main id="simulator">
<h1>Smart Home Sandbox</h1>
<section id="presets-panel">
<h2>Applied Presets (<span id="preset-count">{count}</span>)</h2>
<ul id="preset-list">{items}</ul>
</section>
</main>
<script type="application/json" id="presets">{presets_json}</script>
<script type="application/json" id="color-presets">{colors_json}</script>
<script src="/static/simulator.js" defer></script>
</body>
</html>
"#,
        count = presets.len(),
    ))
}
