use axum::Json;
use serde::Serialize;

use crate::session::extractor::OptionalSession;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavMenu {
    pub signed_in: bool,
    pub primary: Vec<NavLink>,
    pub account: Vec<NavLink>,
}

const fn link(name: &'static str, href: &'static str) -> NavLink {
    NavLink { name, href }
}

pub fn nav_links(signed_in: bool, is_company_admin: bool) -> NavMenu {
    let mut primary = vec![link("Home", "/")];
    if signed_in {
        primary.push(link("Jobs", "/jobs"));
    }
    primary.push(link("Companies", "/companies"));
    primary.push(link("Discussions", "/discussions"));

    let account = if signed_in {
        let mut account = vec![
            link("My Profile", "/profile"),
            link("Applications", "/applications"),
            link("Messages", "/messages"),
        ];
        if is_company_admin {
            account.push(link("Company Dashboard", "/company/dashboard"));
        }
        account
    } else {
        vec![link("Log in", "/auth/login"), link("Register", "/auth/register")]
    };

    NavMenu {
        signed_in,
        primary,
        account,
    }
}

/// GET /api/v1/navigation
pub async fn handle_navigation(OptionalSession(session): OptionalSession) -> Json<NavMenu> {
    let menu = match session {
        Some(session) => nav_links(true, session.is_company_admin),
        None => nav_links(false, false),
    };
    Json(menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|l| l.href).collect()
    }

    #[test]
    fn test_signed_out_menu() {
        let menu = nav_links(false, false);
        assert_eq!(hrefs(&menu.primary), vec!["/", "/companies", "/discussions"]);
        assert_eq!(hrefs(&menu.account), vec!["/auth/login", "/auth/register"]);
    }

    #[test]
    fn test_signed_in_menu_adds_jobs_and_account_links() {
        let menu = nav_links(true, false);
        assert!(hrefs(&menu.primary).contains(&"/jobs"));
        assert_eq!(
            hrefs(&menu.account),
            vec!["/profile", "/applications", "/messages"]
        );
    }

    #[test]
    fn test_company_admin_gets_dashboard() {
        let menu = nav_links(true, true);
        assert_eq!(menu.account.last().unwrap().href, "/company/dashboard");
    }
}
