use crate::model::{StaffMember, StaffStatus};

/// Staff directory filter. Unset criteria match everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffFilter {
    /// Case-insensitive substring of name, role, or specialty.
    pub search: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub status: Option<StaffStatus>,
}

impl StaffFilter {
    pub fn matches(&self, member: &StaffMember) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                member.name.to_lowercase().contains(&term)
                    || member.role().to_lowercase().contains(&term)
                    || member
                        .specialty
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&term))
            }
        };
        let matches_department = match self.department.as_deref() {
            None | Some("") => true,
            Some(department) => member.department == department,
        };
        let matches_role = match self.role.as_deref() {
            None | Some("") => true,
            Some(role) => member.role() == role,
        };
        let matches_status = self.status.is_none_or(|status| member.status == status);

        matches_search && matches_department && matches_role && matches_status
    }

    pub fn apply<'a>(&self, staff: &'a [StaffMember]) -> Vec<&'a StaffMember> {
        staff.iter().filter(|m| self.matches(m)).collect()
    }
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Distinct departments in first-seen order.
pub fn unique_departments(staff: &[StaffMember]) -> Vec<&str> {
    unique(staff.iter().map(|m| m.department.as_str()))
}

/// Distinct role names in first-seen order.
pub fn unique_roles(staff: &[StaffMember]) -> Vec<&str> {
    unique(staff.iter().map(|m| m.role()))
}
