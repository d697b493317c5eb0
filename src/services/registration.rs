// src/services/registration.rs
// DOCUMENTATION: Multi-step registration wizard and the profile field rules
// PURPOSE: Assemble account + role profile into a validated RegisterRequest.
// The same rules run server-side on POST /api/auth/register and on profile updates.

use crate::errors::MarketplaceError;
use crate::models::{
    AccountStep, ArtistProfileInput, FanProfileInput, HostProfileInput, ProfileInput,
    RegisterRequest, Role,
};
use crate::services::us_states;
use std::collections::HashSet;
use validator::Validate;

pub const MAX_ARTIST_GENRES: usize = 5;
pub const MAX_FAN_GENRES: usize = 10;
pub const MAX_GENRE_LEN: usize = 40;
pub const MAX_BIO_LEN: usize = 2000;
pub const MAX_VENUE_CAPACITY: i32 = 100_000;
pub const MAX_LODGING_BEDS: i32 = 50;

fn invalid(msg: impl Into<String>) -> MarketplaceError {
    MarketplaceError::ValidationError(msg.into())
}

/// Trim; blank becomes None; enforce a maximum length
fn optional_text(value: Option<&str>, field: &str, max: usize) -> Result<Option<String>, MarketplaceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => {
            Err(invalid(format!("{} exceeds {} characters", field, max)))
        }
        Some(v) => Ok(Some(v.to_string())),
    }
}

fn required_text(value: &str, field: &str, max: usize) -> Result<String, MarketplaceError> {
    optional_text(Some(value), field, max)?.ok_or_else(|| invalid(format!("{} is required", field)))
}

/// Trim, drop blanks and case-insensitive duplicates
fn clean_genres(genres: &[String], max: usize) -> Result<Vec<String>, MarketplaceError> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for genre in genres.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
        if genre.chars().count() > MAX_GENRE_LEN {
            return Err(invalid(format!("Genre exceeds {} characters", MAX_GENRE_LEN)));
        }
        if seen.insert(genre.to_lowercase()) {
            cleaned.push(genre.to_string());
        }
    }
    if cleaned.len() > max {
        return Err(invalid(format!("At most {} genres are allowed", max)));
    }
    Ok(cleaned)
}

/// Check credentials and identity fields; returns the account with a normalized email
pub fn validate_account(account: &AccountStep) -> Result<AccountStep, MarketplaceError> {
    let account = AccountStep {
        email: account.email.trim().to_lowercase(),
        display_name: account.display_name.trim().to_string(),
        ..account.clone()
    };
    account.validate()?;

    if !account.password.chars().any(|c| c.is_ascii_alphabetic())
        || !account.password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(invalid("Password must contain at least one letter and one digit"));
    }
    if account.password != account.confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    if !account.role.is_self_registrable() {
        return Err(MarketplaceError::Forbidden);
    }

    let display_name = required_text(&account.display_name, "Display name", 80)?;
    Ok(AccountStep {
        display_name,
        ..account
    })
}

pub fn validate_artist(input: &ArtistProfileInput) -> Result<ArtistProfileInput, MarketplaceError> {
    let genres = clean_genres(&input.genres, MAX_ARTIST_GENRES)?;
    if genres.is_empty() {
        return Err(invalid("Pick at least one genre"));
    }

    let website = optional_text(input.website.as_deref(), "Website", 2048)?;
    if let Some(url) = &website {
        if !validator::validate_url(url.as_str()) {
            return Err(invalid("Website must be a valid URL"));
        }
    }

    let spotify_artist_id = optional_text(input.spotify_artist_id.as_deref(), "Spotify id", 22)?;
    if let Some(id) = &spotify_artist_id {
        if id.len() != 22 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("Spotify artist id must be 22 letters or digits"));
        }
    }

    Ok(ArtistProfileInput {
        stage_name: required_text(&input.stage_name, "Stage name", 100)?,
        genres,
        bio: optional_text(input.bio.as_deref(), "Bio", MAX_BIO_LEN)?,
        home_state: us_states::normalize_optional(input.home_state.as_deref())?,
        home_city: optional_text(input.home_city.as_deref(), "Home city", 100)?,
        website,
        spotify_artist_id,
    })
}

pub fn validate_host(input: &HostProfileInput) -> Result<HostProfileInput, MarketplaceError> {
    if !input.offers_venue && !input.offers_lodging {
        return Err(invalid("Hosts must offer a venue, lodging, or both"));
    }

    let (venue_name, capacity) = if input.offers_venue {
        let name = required_text(input.venue_name.as_deref().unwrap_or(""), "Venue name", 120)?;
        match input.capacity {
            Some(c) if c > 0 && c <= MAX_VENUE_CAPACITY => (Some(name), Some(c)),
            _ => {
                return Err(invalid(format!(
                    "Venue capacity must be between 1 and {}",
                    MAX_VENUE_CAPACITY
                )))
            }
        }
    } else {
        (optional_text(input.venue_name.as_deref(), "Venue name", 120)?, None)
    };

    let lodging_beds = if input.offers_lodging {
        match input.lodging_beds {
            Some(b) if b > 0 && b <= MAX_LODGING_BEDS => Some(b),
            _ => {
                return Err(invalid(format!(
                    "Lodging beds must be between 1 and {}",
                    MAX_LODGING_BEDS
                )))
            }
        }
    } else {
        None
    };

    Ok(HostProfileInput {
        venue_name,
        offers_venue: input.offers_venue,
        offers_lodging: input.offers_lodging,
        capacity,
        lodging_beds,
        city: required_text(&input.city, "City", 100)?,
        state: us_states::normalize(&input.state)?,
        description: optional_text(input.description.as_deref(), "Description", MAX_BIO_LEN)?,
    })
}

pub fn validate_fan(input: &FanProfileInput) -> Result<FanProfileInput, MarketplaceError> {
    Ok(FanProfileInput {
        home_state: us_states::normalize_optional(input.home_state.as_deref())?,
        favorite_genres: clean_genres(&input.favorite_genres, MAX_FAN_GENRES)?,
    })
}

pub fn validate_profile(profile: &ProfileInput) -> Result<ProfileInput, MarketplaceError> {
    Ok(match profile {
        ProfileInput::Artist(a) => ProfileInput::Artist(validate_artist(a)?),
        ProfileInput::Host(h) => ProfileInput::Host(validate_host(h)?),
        ProfileInput::Fan(f) => ProfileInput::Fan(validate_fan(f)?),
    })
}

fn ensure_profile_matches(role: Role, profile: &ProfileInput) -> Result<(), MarketplaceError> {
    if profile.role() != role {
        return Err(invalid(format!(
            "A {} account needs a {} profile, got {}",
            role,
            role,
            profile.role()
        )));
    }
    Ok(())
}

/// Full server-side validation of a registration payload
pub fn validate_registration(req: &RegisterRequest) -> Result<RegisterRequest, MarketplaceError> {
    let account = validate_account(&req.account)?;
    ensure_profile_matches(account.role, &req.profile)?;
    let profile = validate_profile(&req.profile)?;
    Ok(RegisterRequest { account, profile })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Account,
    Profile,
    Review,
}

/// Client-side style wizard: each step is validated before moving on
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: WizardStep,
    account: Option<AccountStep>,
    profile: Option<ProfileInput>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        RegistrationWizard {
            step: WizardStep::Account,
            account: None,
            profile: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Changing the role discards a profile of another kind
    pub fn set_account(&mut self, account: AccountStep) {
        if let Some(profile) = &self.profile {
            if profile.role() != account.role {
                self.profile = None;
            }
        }
        self.account = Some(account);
    }

    pub fn set_profile(&mut self, profile: ProfileInput) {
        self.profile = Some(profile);
    }

    /// Validate the current step and advance
    pub fn next(&mut self) -> Result<WizardStep, MarketplaceError> {
        self.step = match self.step {
            WizardStep::Account => {
                let account = self
                    .account
                    .as_ref()
                    .ok_or_else(|| invalid("Account details are required"))?;
                self.account = Some(validate_account(account)?);
                WizardStep::Profile
            }
            WizardStep::Profile => {
                let role = self
                    .account
                    .as_ref()
                    .map(|a| a.role)
                    .ok_or_else(|| invalid("Account details are required"))?;
                let profile = self
                    .profile
                    .as_ref()
                    .ok_or_else(|| invalid("Profile details are required"))?;
                ensure_profile_matches(role, profile)?;
                self.profile = Some(validate_profile(profile)?);
                WizardStep::Review
            }
            WizardStep::Review => {
                return Err(MarketplaceError::InvalidInput(
                    "Already at the final step".to_string(),
                ))
            }
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Account | WizardStep::Profile => WizardStep::Account,
            WizardStep::Review => WizardStep::Profile,
        };
        self.step
    }

    /// Assemble the payload for POST /api/auth/register
    pub fn submit(self) -> Result<RegisterRequest, MarketplaceError> {
        if self.step != WizardStep::Review {
            return Err(MarketplaceError::InvalidInput(
                "Complete every step before submitting".to_string(),
            ));
        }
        match (self.account, self.profile) {
            (Some(account), Some(profile)) => {
                validate_registration(&RegisterRequest { account, profile })
            }
            _ => Err(invalid("Registration is incomplete")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> AccountStep {
        AccountStep {
            email: "  Juniper@Example.COM ".to_string(),
            password: "tourbus42".to_string(),
            confirm_password: "tourbus42".to_string(),
            display_name: " Juniper ".to_string(),
            role,
        }
    }

    fn artist() -> ArtistProfileInput {
        ArtistProfileInput {
            stage_name: "Juniper & the Ravens".to_string(),
            genres: vec!["Folk".to_string(), "folk".to_string(), "Americana".to_string()],
            bio: None,
            home_state: Some("or".to_string()),
            home_city: Some("Bend".to_string()),
            website: Some("https://juniper.example.com".to_string()),
            spotify_artist_id: None,
        }
    }

    fn host() -> HostProfileInput {
        HostProfileInput {
            venue_name: Some("The Barn".to_string()),
            offers_venue: true,
            offers_lodging: false,
            capacity: Some(80),
            lodging_beds: None,
            city: "Taos".to_string(),
            state: "NM".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_account_email_normalized() {
        let normalized = validate_account(&account(Role::Fan)).unwrap();
        assert_eq!(normalized.email, "juniper@example.com");
        assert_eq!(normalized.display_name, "Juniper");
    }

    #[test]
    fn test_password_rules() {
        let mut acct = account(Role::Fan);
        acct.email = "fan@example.com".to_string();

        acct.password = "short1".to_string();
        acct.confirm_password = "short1".to_string();
        assert!(validate_account(&acct).is_err());

        acct.password = "lettersonly".to_string();
        acct.confirm_password = "lettersonly".to_string();
        assert!(validate_account(&acct).is_err());

        acct.password = "letters123".to_string();
        acct.confirm_password = "letters124".to_string();
        assert!(validate_account(&acct).is_err());
    }

    #[test]
    fn test_admin_cannot_self_register() {
        let mut acct = account(Role::Admin);
        acct.email = "root@example.com".to_string();
        assert!(matches!(validate_account(&acct), Err(MarketplaceError::Forbidden)));
    }

    #[test]
    fn test_artist_rules() {
        let cleaned = validate_artist(&artist()).unwrap();
        assert_eq!(cleaned.genres, vec!["Folk", "Americana"]);
        assert_eq!(cleaned.home_state.as_deref(), Some("OR"));

        let mut no_genres = artist();
        no_genres.genres = vec![" ".to_string()];
        assert!(validate_artist(&no_genres).is_err());

        let mut too_many = artist();
        too_many.genres = (0..6).map(|i| format!("genre{}", i)).collect();
        assert!(validate_artist(&too_many).is_err());

        let mut bad_spotify = artist();
        bad_spotify.spotify_artist_id = Some("abc".to_string());
        assert!(validate_artist(&bad_spotify).is_err());

        let mut good_spotify = artist();
        good_spotify.spotify_artist_id = Some("0OdUWJ0sBjDrqHygGUXeCF".to_string());
        assert!(validate_artist(&good_spotify).is_ok());
    }

    #[test]
    fn test_host_rules() {
        assert!(validate_host(&host()).is_ok());

        let mut nothing_offered = host();
        nothing_offered.offers_venue = false;
        assert!(validate_host(&nothing_offered).is_err());

        let mut no_capacity = host();
        no_capacity.capacity = Some(0);
        assert!(validate_host(&no_capacity).is_err());

        let mut lodging_only = host();
        lodging_only.offers_venue = false;
        lodging_only.offers_lodging = true;
        lodging_only.lodging_beds = Some(3);
        let cleaned = validate_host(&lodging_only).unwrap();
        assert_eq!(cleaned.capacity, None);
        assert_eq!(cleaned.lodging_beds, Some(3));

        lodging_only.lodging_beds = None;
        assert!(validate_host(&lodging_only).is_err());
    }

    #[test]
    fn test_registration_profile_must_match_role() {
        let mut acct = account(Role::Host);
        acct.email = "host@example.com".to_string();
        let req = RegisterRequest {
            account: acct,
            profile: ProfileInput::Artist(artist()),
        };
        assert!(matches!(
            validate_registration(&req),
            Err(MarketplaceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_wizard_refuses_to_advance_on_invalid_account() {
        let mut wizard = RegistrationWizard::new();
        assert!(wizard.next().is_err());

        let mut acct = account(Role::Artist);
        acct.email = "not-an-email".to_string();
        wizard.set_account(acct);
        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), WizardStep::Account);
    }

    #[test]
    fn test_wizard_full_flow() {
        let mut wizard = RegistrationWizard::new();
        let mut acct = account(Role::Artist);
        acct.email = "Juniper@Example.com".to_string();
        wizard.set_account(acct);
        assert_eq!(wizard.next().unwrap(), WizardStep::Profile);

        wizard.set_profile(ProfileInput::Host(host()));
        assert!(wizard.next().is_err());

        wizard.set_profile(ProfileInput::Artist(artist()));
        assert_eq!(wizard.next().unwrap(), WizardStep::Review);
        assert!(wizard.next().is_err());

        let req = wizard.submit().unwrap();
        assert_eq!(req.account.email, "juniper@example.com");
        match req.profile {
            ProfileInput::Artist(a) => assert_eq!(a.genres.len(), 2),
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn test_wizard_back_and_early_submit() {
        let mut wizard = RegistrationWizard::new();
        let mut acct = account(Role::Fan);
        acct.email = "fan@example.com".to_string();
        wizard.set_account(acct);
        wizard.next().unwrap();
        assert_eq!(wizard.back(), WizardStep::Account);
        assert!(wizard.clone().submit().is_err());
    }

    #[test]
    fn test_role_change_discards_profile() {
        let mut wizard = RegistrationWizard::new();
        let mut acct = account(Role::Host);
        acct.email = "host@example.com".to_string();
        wizard.set_profile(ProfileInput::Host(host()));
        wizard.set_account(acct.clone());
        wizard.next().unwrap();
        wizard.next().unwrap();

        acct.role = Role::Fan;
        let mut restarted = RegistrationWizard::new();
        restarted.set_profile(ProfileInput::Host(host()));
        restarted.set_account(acct);
        restarted.next().unwrap();
        assert!(restarted.next().is_err());
    }
}
