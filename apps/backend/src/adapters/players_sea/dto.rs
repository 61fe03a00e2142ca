//! DTOs for players_sea adapter.

/// DTO for provisioning a player from verified token claims.
#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub sub: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub referral_code: String,
    pub invited_by: Option<i64>,
}

impl PlayerCreate {
    pub fn new(sub: impl Into<String>, referral_code: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            display_name: None,
            email: None,
            referral_code: referral_code.into(),
            invited_by: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
