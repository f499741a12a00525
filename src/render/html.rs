//! Embeddable HTML fragment for a render model.

use crate::error::{KgscopeError, Result};
use crate::render::RenderModel;

const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Container div plus the scripts that draw `model` into it.
///
/// The network object is exposed as `window.kgNetwork` so the hosting page
/// can attach its own event handlers.
pub fn render_fragment(model: &RenderModel, height: &str, width: &str) -> Result<String> {
    if height.trim().is_empty() || width.trim().is_empty() {
        return Err(KgscopeError::Render("height and width must be set".to_string()));
    }
    // "</" inside a script element would end it early
    let data = serde_json::to_string(model)?.replace("</", "<\\/");

    Ok(format!(
        r#"<div id="kg-network" style="height: {height}; width: {width}; border: 1px solid lightgray;"></div>
<script src="{js}"></script>
<script type="application/json" id="kg-data">{data}</script>
<script>
(function () {{
  var data = JSON.parse(document.getElementById("kg-data").textContent);
  var container = document.getElementById("kg-network");
  window.kgNetwork = new vis.Network(
    container,
    {{ nodes: new vis.DataSet(data.nodes), edges: new vis.DataSet(data.edges) }},
    data.options
  );
}})();
</script>
"#,
        height = escape_html(height),
        width = escape_html(width),
        js = VIS_NETWORK_JS,
        data = data,
    ))
}
