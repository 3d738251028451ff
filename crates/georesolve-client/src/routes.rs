use georesolve_shared::Role;

/// Every screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    CitizenDashboard,
    CitizenReport,
    CitizenHistory,
    AdminDashboard,
    AdminComplaints,
    AdminAnalytics,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Self::Landing,
        Self::Login,
        Self::Register,
        Self::CitizenDashboard,
        Self::CitizenReport,
        Self::CitizenHistory,
        Self::AdminDashboard,
        Self::AdminComplaints,
        Self::AdminAnalytics,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::CitizenDashboard => "/citizen/dashboard",
            Self::CitizenReport => "/citizen/report",
            Self::CitizenHistory => "/citizen/history",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminComplaints => "/admin/complaints",
            Self::AdminAnalytics => "/admin/analytics",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Role a session must carry to view this screen. `None` for public screens.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Landing | Self::Login | Self::Register => None,
            Self::CitizenDashboard | Self::CitizenReport | Self::CitizenHistory => {
                Some(Role::Citizen)
            }
            Self::AdminDashboard | Self::AdminComplaints | Self::AdminAnalytics => {
                Some(Role::Admin)
            }
        }
    }

    pub fn is_protected(&self) -> bool {
        self.required_role().is_some()
    }

    /// Where a freshly authenticated actor lands.
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Citizen => Self::CitizenDashboard,
            Role::Admin => Self::AdminDashboard,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
