//! Minimal HTML pages for the browser front-end.

use crate::render::escape_html;
use crate::resolve::Candidate;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

fn search_form(query: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"query\" value=\"{}\" placeholder=\"Name\" autofocus>\n\
         <button type=\"submit\">Search</button>\n</form>",
        escape_html(query)
    )
}

pub fn details_href(uri: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(uri.as_bytes()).collect();
    format!("/details/?resource={}", encoded)
}

/// Empty search page.
pub fn index_page() -> String {
    layout("kgscope", &format!("<h1>kgscope</h1>\n{}", search_form("")))
}

/// Search page with results, a "no results" note or an error message.
pub fn results_page(query: &str, candidates: &[Candidate], error: Option<&str>) -> String {
    let mut body = format!("<h1>kgscope</h1>\n{}\n", search_form(query));

    if let Some(error) = error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    } else if candidates.is_empty() {
        body.push_str("<p>No results found.</p>\n");
    } else {
        body.push_str("<ul class=\"results\">\n");
        for candidate in candidates {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a> <small>({:.0})</small></li>\n",
                escape_html(&details_href(&candidate.uri)),
                escape_html(&candidate.label),
                candidate.score
            ));
        }
        body.push_str("</ul>\n");
    }

    layout("kgscope - search", &body)
}

/// Graph page: rendered fragment plus a panel filled from `/node_description` on click.
pub fn details_page(label: &str, graph_fragment: &str) -> String {
    let body = format!(
        "<p><a href=\"/\">&larr; New search</a></p>\n\
         <h1>{label}</h1>\n\
         {fragment}\n\
         <div id=\"kg-description\"></div>\n\
         <script>\n\
         window.kgNetwork.on(\"click\", function (params) {{\n  \
           if (!params.nodes.length) {{ return; }}\n  \
           fetch(\"/node_description?node_uri=\" + encodeURIComponent(params.nodes[0]))\n    \
             .then(function (r) {{ return r.json(); }})\n    \
             .then(function (d) {{\n      \
               document.getElementById(\"kg-description\").textContent = d.description || d.error;\n    \
             }});\n\
         }});\n\
         </script>",
        label = escape_html(label),
        fragment = graph_fragment,
    );
    layout(label, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_href_encodes_uri() {
        assert_eq!(
            details_href("http://dbpedia.org/resource/Curie_(unit)"),
            "/details/?resource=http%3A%2F%2Fdbpedia.org%2Fresource%2FCurie_%28unit%29"
        );
    }

    #[test]
    fn test_results_page_variants() {
        let candidates = vec![Candidate {
            uri: "http://dbpedia.org/resource/Marie_Curie".to_string(),
            label: "Marie Curie".to_string(),
            score: 100.0,
        }];
        let page = results_page("Curie", &candidates, None);
        assert!(page.contains("Marie Curie"));
        assert!(page.contains("resource=http%3A%2F%2Fdbpedia.org"));

        let page = results_page("Bohr", &[], None);
        assert!(page.contains("No results found."));

        let page = results_page("Curie", &[], Some("Store down"));
        assert!(page.contains("Store down"));
        assert!(!page.contains("No results found."));
    }

    #[test]
    fn test_query_is_escaped() {
        let page = results_page("<script>", &[], None);
        assert!(page.contains("value=\"&lt;script&gt;\""));
    }
}
