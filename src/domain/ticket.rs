use std::fmt;

/// Numeric Teamwork task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(pub u64);

impl TicketId {
    /// Accepts either a bare number or a task URL of the form
    /// `{base_url}/tasks/{id}`. Anything after the leading digits of the
    /// URL form is ignored.
    pub fn normalize(raw: &str, base_url: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<u64>() {
            return Some(Self(id));
        }

        let prefix = format!("{}/tasks/", base_url.trim_end_matches('/'));
        let rest = raw.strip_prefix(&prefix)?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..digits_end].parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct TicketSummary {
    pub title: String,
    pub project_name: String,
    pub list_name: String,
    pub description: String,
    pub creator_name: String,
    pub assignee: Option<String>,
    pub estimated_minutes: Option<u64>,
}

impl fmt::Display for TicketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.project_name, self.list_name)?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "*".repeat(self.title.chars().count()))?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "---")?;
        writeln!(f, "Created by {}", self.creator_name)?;
        match &self.assignee {
            Some(assignee) => writeln!(f, "Assigned to {assignee}")?,
            None => writeln!(f, "Assigned to nobody yet")?,
        }
        if let Some(minutes) = self.estimated_minutes {
            writeln!(f, "Time estimate: {:.1}hrs", minutes as f64 / 60.0)?;
        }
        write!(f, "---")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://acme.teamwork.com";

    #[test]
    fn parses_bare_numbers() {
        for n in [0_u64, 7, 42, 123, 987_654_321, u64::MAX] {
            assert_eq!(
                TicketId::normalize(&n.to_string(), BASE),
                Some(TicketId(n))
            );
        }
    }

    #[test]
    fn extracts_leading_digits_from_task_url() {
        let url = format!("{BASE}/tasks/42extra");
        assert_eq!(TicketId::normalize(&url, BASE), Some(TicketId(42)));

        let url = format!("{BASE}/tasks/1234?c=99#comment");
        assert_eq!(TicketId::normalize(&url, BASE), Some(TicketId(1234)));
    }

    #[test]
    fn ignores_trailing_slash_on_base_url() {
        let url = format!("{BASE}/tasks/77");
        assert_eq!(
            TicketId::normalize(&url, "http://acme.teamwork.com/"),
            Some(TicketId(77))
        );
    }

    #[test]
    fn rejects_unrecognised_input() {
        assert_eq!(TicketId::normalize("not-a-ticket", BASE), None);
        assert_eq!(TicketId::normalize("", BASE), None);
        assert_eq!(TicketId::normalize("-5", BASE), None);
        assert_eq!(TicketId::normalize(&format!("{BASE}/tasks/"), BASE), None);
        assert_eq!(
            TicketId::normalize(&format!("{BASE}/tasks/abc"), BASE),
            None
        );
    }

    #[test]
    fn rejects_url_with_other_prefix() {
        assert_eq!(
            TicketId::normalize("https://acme.teamwork.com/tasks/42", BASE),
            None
        );
        assert_eq!(
            TicketId::normalize("http://other.example.com/tasks/42", BASE),
            None
        );
        assert_eq!(
            TicketId::normalize(&format!("{BASE}/projects/42"), BASE),
            None
        );
    }

    fn summary() -> TicketSummary {
        TicketSummary {
            title: "Fix login bug".to_string(),
            project_name: "Website".to_string(),
            list_name: "Backlog".to_string(),
            description: "Users cannot log in.".to_string(),
            creator_name: "Ada Lovelace".to_string(),
            assignee: None,
            estimated_minutes: None,
        }
    }

    #[test]
    fn renders_summary_without_assignee_or_estimate() {
        let rendered = summary().to_string();
        assert_eq!(
            rendered,
            "[Website] Backlog\n\
             Fix login bug\n\
             *************\n\
             Users cannot log in.\n\
             ---\n\
             Created by Ada Lovelace\n\
             Assigned to nobody yet\n\
             ---"
        );
    }

    #[test]
    fn renders_assignee_and_estimate() {
        let mut ticket = summary();
        ticket.assignee = Some("Grace Hopper".to_string());
        ticket.estimated_minutes = Some(90);
        let rendered = ticket.to_string();
        assert!(rendered.contains("Assigned to Grace Hopper\n"));
        assert!(rendered.contains("Time estimate: 1.5hrs\n"));
    }
}
