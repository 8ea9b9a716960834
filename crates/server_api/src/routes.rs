pub const HOME_PATH: &str = "/";
pub const CONTACT_PATH: &str = "/contact";
pub const EDIT_PATH: &str = "/edit";

/// Every (path, method) combination the endpoint answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    ShowContact,
    UpdateContact,
    EditContact,
}

impl Route {
    /// Unknown paths resolve to `None`, which callers report as not found.
    pub fn resolve(path: &str, method: &str) -> Option<Self> {
        match path {
            HOME_PATH => Some(Self::Home),
            CONTACT_PATH if method == "PUT" => Some(Self::UpdateContact),
            CONTACT_PATH => Some(Self::ShowContact),
            EDIT_PATH => Some(Self::EditContact),
            _ => None,
        }
    }

    pub fn mutates(self) -> bool {
        matches!(self, Self::UpdateContact)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ShowContact => "show_contact",
            Self::UpdateContact => "update_contact",
            Self::EditContact => "edit_contact",
        }
    }
}
