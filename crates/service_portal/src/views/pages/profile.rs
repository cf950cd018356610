//! Account page.

use std::fmt;

use portal_core::showcase::ClientProfile;
use portal_core::User;

use crate::views::Escaped;

pub struct ProfilePage<'a> {
    /// Account from the data service; the demo profile fills the gaps
    pub user: Option<&'a User>,
    pub client: &'a ClientProfile,
}

impl fmt::Display for ProfilePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, email, username, role, initials) = match self.user {
            Some(u) => (
                u.display_name(),
                u.email.clone(),
                u.username.clone(),
                u.role.as_str(),
                u.initials(),
            ),
            None => (
                self.client.name.clone(),
                self.client.email.clone(),
                String::new(),
                "client",
                String::new(),
            ),
        };
        write!(
            f,
            r#"<h1 class="page-title">Mon Profil</h1>
<section class="panel profile-card"><span class="avatar large">{initials}</span><div><h2>{name}</h2><p>{email}</p></div>
<dl class="profile-facts"><div><dt>Nom d'utilisateur</dt><dd>{username}</dd></div><div><dt>Email</dt><dd>{email}</dd></div><div><dt>Rôle</dt><dd>{role}</dd></div></dl></section>
"#,
            initials = Escaped(&initials),
            name = Escaped(&name),
            email = Escaped(&email),
            username = Escaped(&username),
            role = role,
        )?;
        let advisor = &self.client.advisor;
        write!(
            f,
            r#"<section class="panel advisor"><h2>Mon conseiller</h2><img src="{}" alt="" width="64" height="64"><p><strong>{}</strong></p><p>{}</p><p>{}</p></section>
<form method="post" action="/logout"><button type="submit" class="button-outline">Se déconnecter</button></form>
"#,
            Escaped(&advisor.photo),
            Escaped(&advisor.name),
            Escaped(&advisor.email),
            Escaped(&advisor.phone)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::showcase::current_client;
    use portal_core::Role;

    #[test]
    fn test_profile_uses_account() {
        let client = current_client();
        let user = User {
            id: 7,
            username: "cmartin".into(),
            email: "claire@example.com".into(),
            role: Role::Sales,
            first_name: "Claire".into(),
            last_name: "Martin".into(),
        };
        let html = ProfilePage {
            user: Some(&user),
            client: &client,
        }
        .to_string();
        assert!(html.contains("<h2>Claire Martin</h2>"));
        assert!(html.contains("<dd>cmartin</dd>"));
        assert!(html.contains(">CM<"));
        assert!(html.contains("Se déconnecter"));
    }

    #[test]
    fn test_profile_falls_back_to_demo_client() {
        let client = current_client();
        let html = ProfilePage {
            user: None,
            client: &client,
        }
        .to_string();
        assert!(html.contains("<h2>Jean Dupont</h2>"));
    }
}
