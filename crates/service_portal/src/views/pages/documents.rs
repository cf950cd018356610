//! Client documents with search and category filter.

use std::fmt;

use portal_core::portfolio::{filter_documents, ClientDocument, DocumentCategory};
use serde::Deserialize;

use crate::views::Escaped;

/// Query string of `/documents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentsQuery {
    #[serde(default)]
    pub search: Option<String>,
    /// Category label, or `Tous`
    #[serde(default)]
    pub category: Option<String>,
}

pub struct DocumentsPage<'a> {
    pub query: &'a DocumentsQuery,
    pub documents: &'a [ClientDocument],
}

/// Sum of sizes written like `2.3 MB`
fn total_size_mb(documents: &[ClientDocument]) -> f64 {
    documents
        .iter()
        .filter_map(|d| d.size.split_whitespace().next())
        .filter_map(|n| n.parse::<f64>().ok())
        .sum()
}

impl fmt::Display for DocumentsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible = filter_documents(
            self.documents,
            self.query.search.as_deref(),
            self.query.category.as_deref(),
        );
        let current = self.query.category.as_deref().unwrap_or("Tous");

        write!(
            f,
            r#"<h1 class="page-title">Mes Documents</h1><div class="summary-cards"><div class="summary-card"><p>Total Documents</p><strong>{}</strong></div><div class="summary-card"><p>Taille Totale</p><strong>{:.1} MB</strong></div></div>"#,
            self.documents.len(),
            total_size_mb(self.documents)
        )?;
        write!(
            f,
            r#"<form class="document-filters" method="get" action="/documents"><input type="search" name="search" placeholder="Rechercher un document" value="{}"><select name="category"><option value="Tous">Toutes les catégories</option>"#,
            Escaped(self.query.search.as_deref().unwrap_or_default())
        )?;
        for category in DocumentCategory::ALL {
            let selected = if category.label().eq_ignore_ascii_case(current) {
                " selected"
            } else {
                ""
            };
            write!(f, r#"<option value="{0}"{selected}>{0}</option>"#, category.label())?;
        }
        f.write_str(r#"</select><button type="submit" class="button">Filtrer</button></form>"#)?;

        if visible.is_empty() {
            return f.write_str(r#"<p class="empty">Aucun document trouvé</p>"#);
        }
        f.write_str(r#"<ul class="client-documents">"#)?;
        for doc in visible {
            write!(
                f,
                r#"<li><span class="file-type">{}</span><div class="doc-body"><strong>{}</strong><p>{}</p><small>{} · {} · {}</small>"#,
                Escaped(&doc.file_type),
                Escaped(&doc.name),
                Escaped(&doc.description),
                doc.category.label(),
                Escaped(&doc.date),
                Escaped(&doc.size)
            )?;
            if let Some(product) = &doc.product_name {
                write!(f, r#"<small class="doc-product">{}</small>"#, Escaped(product))?;
            }
            write!(
                f,
                r#"</div><a class="button-outline" href="{}" download>Télécharger</a></li>"#,
                Escaped(&doc.url)
            )?;
        }
        f.write_str("</ul>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::showcase::client_documents;

    #[test]
    fn test_all_documents() {
        let docs = client_documents();
        let query = DocumentsQuery::default();
        let html = DocumentsPage {
            query: &query,
            documents: &docs,
        }
        .to_string();
        assert_eq!(html.matches("Télécharger").count(), docs.len());
        assert!(html.contains("<strong>8</strong>"));
        assert!(html.contains("<strong>16.7 MB</strong>"));
    }

    #[test]
    fn test_category_filter() {
        let docs = client_documents();
        let query = DocumentsQuery {
            search: None,
            category: Some("Documentation".into()),
        };
        let html = DocumentsPage {
            query: &query,
            documents: &docs,
        }
        .to_string();
        assert_eq!(html.matches("Télécharger").count(), 2);
        assert!(html.contains(r#"<option value="Documentation" selected>"#));
    }

    #[test]
    fn test_no_match() {
        let docs = client_documents();
        let query = DocumentsQuery {
            search: Some("introuvable".into()),
            category: None,
        };
        let html = DocumentsPage {
            query: &query,
            documents: &docs,
        }
        .to_string();
        assert!(html.contains("Aucun document trouvé"));
    }
}
