use std::fmt;

pub struct NotFoundPage;

impl fmt::Display for NotFoundPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="centered-message"><p class="kicker">Erreur 404</p><h1>Page introuvable</h1><p>La page demandée n'existe pas ou a été déplacée.</p><a class="button" href="/">Retour à l'accueil</a></section>
"#,
        )
    }
}
